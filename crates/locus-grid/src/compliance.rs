//! Grid trait compliance helpers.
//!
//! Each function checks one invariant of the [`Grid`] contract over an
//! explicit list of cells. Reused by the square and hex test modules; the
//! gridless grid has continuous coordinates and is checked separately.

use crate::grid::Grid;
use indexmap::IndexSet;
use locus_core::Position;

/// Every valid cell of a discrete grid, found by scanning its bounding box.
pub fn all_cells(grid: &dyn Grid) -> Vec<Position> {
    let dims = grid.dimensions();
    let mut cells = Vec::new();
    for x in 0..dims.width.ceil().max(0.0) as i64 {
        for y in 0..dims.height.ceil().max(0.0) as i64 {
            let pos = Position::new(x as f64, y as f64);
            if grid.is_valid_position(pos) {
                cells.push(pos);
            }
        }
    }
    cells
}

/// `distance(a, a) == 0`.
pub fn assert_distance_reflexive(grid: &dyn Grid, cells: &[Position]) {
    for &c in cells {
        let d = grid.distance(c, c);
        assert!(d.abs() < f64::EPSILON, "distance({c}, {c}) = {d}, expected 0");
    }
}

/// `distance(a, b) == distance(b, a)`.
pub fn assert_distance_symmetric(grid: &dyn Grid, cells: &[Position]) {
    for &a in cells {
        for &b in cells {
            let dab = grid.distance(a, b);
            let dba = grid.distance(b, a);
            assert!(
                (dab - dba).abs() < f64::EPSILON,
                "distance({a}, {b}) = {dab} != distance({b}, {a}) = {dba}"
            );
        }
    }
}

/// `d(a, c) <= d(a, b) + d(b, c)`.
pub fn assert_distance_triangle_inequality(grid: &dyn Grid, cells: &[Position]) {
    for &a in cells {
        for &b in cells {
            for &c in cells {
                let dac = grid.distance(a, c);
                let dab = grid.distance(a, b);
                let dbc = grid.distance(b, c);
                assert!(
                    dac <= dab + dbc + f64::EPSILON,
                    "triangle inequality violated: d({a},{c})={dac} > d({a},{b})={dab} + d({b},{c})={dbc}"
                );
            }
        }
    }
}

/// Neighbours are valid, adjacent, unique and symmetric.
pub fn assert_neighbors_consistent(grid: &dyn Grid, cells: &[Position]) {
    for &c in cells {
        let neighbors = grid.neighbors(c);
        let unique: IndexSet<Position> = neighbors.iter().copied().collect();
        assert_eq!(unique.len(), neighbors.len(), "duplicate neighbours of {c}");
        for &nb in &neighbors {
            assert!(grid.is_valid_position(nb), "neighbour {nb} of {c} is invalid");
            assert!(grid.is_adjacent(c, nb), "neighbour {nb} of {c} is not adjacent");
            assert!(
                grid.neighbors(nb).contains(&c),
                "neighbour symmetry violated: {nb} in N({c}) but {c} not in N({nb})"
            );
        }
    }
}

/// A zero-radius range is exactly the center; radius 1 is the center plus
/// its neighbours.
pub fn assert_range_matches_neighbors(grid: &dyn Grid, cells: &[Position]) {
    for &c in cells {
        assert_eq!(grid.positions_in_range(c, 0.0), vec![c], "range 0 of {c}");
        let range: IndexSet<Position> = grid.positions_in_range(c, 1.0).into_iter().collect();
        let mut expected: IndexSet<Position> = grid.neighbors(c).into_iter().collect();
        expected.insert(c);
        assert_eq!(range.len(), expected.len(), "range 1 of {c}");
        assert!(expected.iter().all(|p| range.contains(p)), "range 1 of {c}");
    }
}

/// Lines start and end at their endpoints and contain only valid cells.
pub fn assert_lines_well_formed(grid: &dyn Grid, cells: &[Position]) {
    for &a in cells {
        for &b in cells {
            let line = grid.line_of_sight(a, b);
            assert_eq!(line.first(), Some(&a), "line {a} -> {b} does not start at {a}");
            assert_eq!(line.last(), Some(&b), "line {a} -> {b} does not end at {b}");
            assert!(
                line.iter().all(|p| grid.is_valid_position(*p)),
                "line {a} -> {b} leaves the grid"
            );
        }
    }
}

/// Run every compliance check.
pub fn run_full_compliance(grid: &dyn Grid, cells: &[Position]) {
    assert!(!cells.is_empty(), "compliance needs at least one cell");
    assert_distance_reflexive(grid, cells);
    assert_distance_symmetric(grid, cells);
    assert_distance_triangle_inequality(grid, cells);
    assert_neighbors_consistent(grid, cells);
    assert_range_matches_neighbors(grid, cells);
    assert_lines_well_formed(grid, cells);
}
