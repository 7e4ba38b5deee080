use locus_core::{CubeCoordinate, HexOrientation, Position};
use locus_grid::{
    AnyGrid, Grid, GridShape, GridlessConfig, GridlessGrid, HexGrid, HexGridConfig, HexPathFinder,
    PathFinder, SquareGrid, SquareGridConfig,
};
use std::collections::HashSet;

fn p(x: f64, y: f64) -> Position {
    Position::new(x, y)
}

#[test]
fn pointy_hex_distance_is_cube_distance_not_chebyshev() {
    let hex = HexGrid::new(HexGridConfig::new(10.0, 10.0));
    assert_eq!(hex.distance(p(5.0, 5.0), p(6.0, 5.0)), 1.0);
    assert_eq!(hex.distance(p(5.0, 5.0), p(6.0, 6.0)), 2.0);

    let square = SquareGrid::new(SquareGridConfig::new(10.0, 10.0));
    assert_eq!(square.distance(p(5.0, 5.0), p(6.0, 6.0)), 1.0);
}

#[test]
fn offsets_round_trip_in_both_orientations() {
    for orientation in [HexOrientation::PointyTop, HexOrientation::FlatTop] {
        let hex = HexGrid::new(HexGridConfig::new(12.0, 12.0).with_orientation(orientation));
        for row in 0..12 {
            for col in 0..12 {
                let offset = p(col as f64, row as f64);
                assert_eq!(hex.to_offset(hex.from_offset(offset)), offset, "{orientation} {offset}");
            }
        }
    }
}

#[test]
fn rings_and_spirals_have_closed_form_sizes() {
    let hex = HexGrid::new(HexGridConfig::new(100.0, 100.0));
    let center = p(50.0, 25.0);
    assert_eq!(hex.ring(center, 0).len(), 1);
    for r in 1..=6u32 {
        assert_eq!(hex.ring(center, r).len(), 6 * r as usize);
        assert_eq!(hex.spiral(center, r).len(), 1 + 3 * (r * (r + 1)) as usize);
    }
}

#[test]
fn open_field_paths_are_as_long_as_the_distance() {
    let finder = HexPathFinder::new();
    let empty = HashSet::new();
    let start = CubeCoordinate::from_xz(-2, 3);
    for goal in [
        CubeCoordinate::from_xz(4, -1),
        CubeCoordinate::from_xz(-7, 0),
        CubeCoordinate::from_xz(0, 6),
    ] {
        let path = finder.find_path(start, goal, &empty);
        assert_eq!(path.len() as u32, start.distance(goal));
        assert_eq!(path.last(), Some(&goal));
        let mut prev = start;
        for step in &path {
            assert_eq!(prev.distance(*step), 1);
            prev = *step;
        }
    }
    assert!(finder.find_path(start, start, &empty).is_empty());
    let goal = CubeCoordinate::from_xz(1, 1);
    assert!(finder.find_path(start, goal, &[goal].into_iter().collect()).is_empty());
}

#[test]
fn bounded_search_gives_up_on_walled_goals() {
    let grid = HexGrid::new(HexGridConfig::new(8.0, 8.0));
    let goal = CubeCoordinate::from_xz(5, 3);
    let wall: HashSet<_> = goal.neighbors().into_iter().collect();
    let path = HexPathFinder::within(grid).find_path(CubeCoordinate::from_xz(0, 0), goal, &wall);
    assert!(path.is_empty());
}

#[test]
fn any_grid_reports_each_shape() {
    let grids: [AnyGrid; 3] = [
        SquareGrid::new(SquareGridConfig::new(4.0, 4.0)).into(),
        HexGrid::new(HexGridConfig::new(4.0, 4.0)).into(),
        GridlessGrid::new(GridlessConfig::new(4.0, 4.0)).into(),
    ];
    let shapes: Vec<_> = grids.iter().map(|g| g.shape()).collect();
    assert_eq!(shapes, vec![GridShape::Square, GridShape::Hex, GridShape::Gridless]);

    // Right edge: outside square and hex, inside the closed gridless area.
    let edge = p(4.0, 2.0);
    let valid: Vec<_> = grids.iter().map(|g| g.is_valid_position(edge)).collect();
    assert_eq!(valid, vec![false, false, true]);
}

#[test]
fn gridless_range_contains_center_first() {
    let grid = GridlessGrid::new(GridlessConfig::new(20.0, 20.0));
    let center = p(10.0, 10.0);
    let found = grid.positions_in_range(center, 2.0);
    assert_eq!(found.first(), Some(&center));
    assert!(found.iter().all(|q| grid.distance(center, *q) <= 2.0 + 1e-9));
}
