//! Square grid with 8-connected neighbourhood (cardinal + diagonal).

use crate::grid::{integer_cells, Cone, Grid};
use locus_core::{Dimensions, GridShape, Position, Rectangle};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// All 8 offsets: the diagonals and orthogonals around a cell.
const OFFSETS_8: [(f64, f64); 8] = [
    (-1.0, -1.0),
    (-1.0, 0.0),
    (-1.0, 1.0),
    (0.0, -1.0),
    (0.0, 1.0),
    (1.0, -1.0),
    (1.0, 0.0),
    (1.0, 1.0),
];

/// Construction parameters for a [`SquareGrid`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SquareGridConfig {
    /// Number of columns.
    pub width: f64,
    /// Number of rows.
    pub height: f64,
}

impl SquareGridConfig {
    /// A `width x height` grid.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A square grid where diagonal steps cost the same as orthogonal ones.
///
/// Cells are whole-number positions with `0 <= x < width` and
/// `0 <= y < height`. Distance is Chebyshev, `max(|dx|, |dy|)`, so an
/// interior cell has 8 neighbours at distance 1. Degenerate dimensions are
/// accepted and produce a grid with no valid cells.
///
/// # Examples
///
/// ```
/// use locus_core::Position;
/// use locus_grid::{Grid, SquareGrid, SquareGridConfig};
///
/// let grid = SquareGrid::new(SquareGridConfig::new(10.0, 10.0));
/// assert!(grid.is_valid_position(Position::new(9.0, 9.0)));
/// assert!(!grid.is_valid_position(Position::new(10.0, 10.0)));
///
/// let a = Position::new(2.0, 2.0);
/// assert_eq!(grid.distance(a, Position::new(5.0, 4.0)), 3.0);
/// assert_eq!(grid.neighbors(a).len(), 8);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SquareGrid {
    dimensions: Dimensions,
}

impl SquareGrid {
    /// Create a square grid.
    pub fn new(config: SquareGridConfig) -> Self {
        Self {
            dimensions: Dimensions::new(config.width, config.height),
        }
    }

    /// Largest valid coordinate on each axis.
    fn max_cell(&self) -> (f64, f64) {
        (
            self.dimensions.width.ceil() - 1.0,
            self.dimensions.height.ceil() - 1.0,
        )
    }
}

impl Grid for SquareGrid {
    fn shape(&self) -> GridShape {
        GridShape::Square
    }

    fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    fn is_valid_position(&self, pos: Position) -> bool {
        pos.is_integral() && self.dimensions.contains(pos)
    }

    fn distance(&self, from: Position, to: Position) -> f64 {
        (to.x - from.x).abs().max((to.y - from.y).abs())
    }

    fn neighbors(&self, pos: Position) -> SmallVec<[Position; 8]> {
        OFFSETS_8
            .iter()
            .map(|&(dx, dy)| pos.add(Position::new(dx, dy)))
            .filter(|n| self.is_valid_position(*n))
            .collect()
    }

    /// Bresenham line between the two cells.
    fn line_of_sight(&self, from: Position, to: Position) -> Vec<Position> {
        if from == to {
            return vec![from];
        }

        let (x0, y0) = (from.x as i64, from.y as i64);
        let (x1, y1) = (to.x as i64, to.y as i64);
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };

        let mut out = Vec::with_capacity((dx.max(dy) + 1) as usize);
        let mut err = dx - dy;
        let (mut x, mut y) = (x0, y0);
        loop {
            let pos = Position::new(x as f64, y as f64);
            if self.is_valid_position(pos) {
                out.push(pos);
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
        out
    }

    /// The `(2r + 1)^2` square around `center`, clipped to the grid.
    fn positions_in_range(&self, center: Position, radius: f64) -> Vec<Position> {
        if radius < 0.0 || !center.is_finite() {
            return Vec::new();
        }
        let (max_x, max_y) = self.max_cell();
        integer_cells(
            (center.x - radius).max(0.0),
            (center.x + radius).min(max_x),
            (center.y - radius).max(0.0),
            (center.y + radius).min(max_y),
        )
        .filter(|p| self.is_valid_position(*p) && self.distance(center, *p) <= radius)
        .collect()
    }

    fn positions_in_rectangle(&self, rect: &Rectangle) -> Vec<Position> {
        let (max_x, max_y) = self.max_cell();
        integer_cells(
            rect.position.x.max(0.0),
            (rect.position.x + rect.dimensions.width).min(max_x + 1.0),
            rect.position.y.max(0.0),
            (rect.position.y + rect.dimensions.height).min(max_y + 1.0),
        )
        .filter(|p| self.is_valid_position(*p) && rect.contains(*p))
        .collect()
    }

    fn positions_in_cone(
        &self,
        origin: Position,
        direction: Position,
        length: f64,
        angle: f64,
    ) -> Vec<Position> {
        let Some(cone) = Cone::new(origin, direction, angle) else {
            return Vec::new();
        };
        self.positions_in_range(origin, length)
            .into_iter()
            .filter(|p| cone.covers(*p))
            .collect()
    }
}
