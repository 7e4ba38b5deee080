//! The `Grid` trait and the `AnyGrid` tagged variant.

use crate::gridless::GridlessGrid;
use crate::hex::HexGrid;
use crate::square::SquareGrid;
use locus_core::{Circle, CubeCoordinate, Dimensions, GridShape, Position, Rectangle};
use smallvec::SmallVec;

/// Spatial rules of a room.
///
/// A grid is immutable configuration: it knows its bounds and metric but
/// nothing about the entities placed on it. Methods that accept positions
/// assume the caller validated them with
/// [`is_valid_position`](Grid::is_valid_position); query results only ever
/// contain valid positions.
pub trait Grid: Send + Sync {
    /// Which topology this grid implements.
    fn shape(&self) -> GridShape;

    /// Configured bounds.
    fn dimensions(&self) -> Dimensions;

    /// Returns `true` if `pos` addresses a cell (or point) of this grid.
    fn is_valid_position(&self, pos: Position) -> bool;

    /// Distance under this grid's metric.
    fn distance(&self, from: Position, to: Position) -> f64;

    /// Adjacent valid positions, in a fixed per-strategy order.
    ///
    /// `SmallVec<[Position; 8]>` covers every strategy without allocating.
    fn neighbors(&self, pos: Position) -> SmallVec<[Position; 8]>;

    /// Returns `true` if the two positions are within distance 1.
    fn is_adjacent(&self, a: Position, b: Position) -> bool {
        self.distance(a, b) <= 1.0
    }

    /// Positions on the line from `from` to `to`, both inclusive, ordered
    /// from `from`. Out-of-bounds samples are skipped.
    fn line_of_sight(&self, from: Position, to: Position) -> Vec<Position>;

    /// Valid positions within `radius` of `center` (inclusive), center
    /// included when it qualifies.
    fn positions_in_range(&self, center: Position, radius: f64) -> Vec<Position>;

    /// Valid positions inside `rect`.
    fn positions_in_rectangle(&self, rect: &Rectangle) -> Vec<Position>;

    /// Valid positions inside `circle`, measured with this grid's metric.
    fn positions_in_circle(&self, circle: &Circle) -> Vec<Position> {
        self.positions_in_range(circle.center, circle.radius)
    }

    /// Valid positions along a line; identical to
    /// [`line_of_sight`](Grid::line_of_sight).
    fn positions_in_line(&self, from: Position, to: Position) -> Vec<Position> {
        self.line_of_sight(from, to)
    }

    /// Valid positions within `length` of `origin` whose bearing lies within
    /// `angle / 2` radians of `direction`. The origin is always included if
    /// valid. A zero `direction` yields nothing.
    fn positions_in_cone(
        &self,
        origin: Position,
        direction: Position,
        length: f64,
        angle: f64,
    ) -> Vec<Position>;
}

/// Angular filter shared by every cone query.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Cone {
    origin: Position,
    unit: Position,
    half_angle: f64,
}

impl Cone {
    /// `None` when `direction` has zero length.
    pub(crate) fn new(origin: Position, direction: Position, angle: f64) -> Option<Self> {
        if direction.is_zero() || !direction.is_finite() {
            return None;
        }
        Some(Self {
            origin,
            unit: direction.normalize(),
            half_angle: angle / 2.0,
        })
    }

    pub(crate) fn covers(&self, pos: Position) -> bool {
        let offset = pos.sub(self.origin);
        let len = offset.length();
        if len == 0.0 {
            return true;
        }
        let cos = (self.unit.x * offset.x + self.unit.y * offset.y) / len;
        cos.clamp(-1.0, 1.0).acos() <= self.half_angle
    }
}

/// Whole-number positions in the closed box `[min_x, max_x] x [min_y, max_y]`,
/// `x` outer, `y` inner. Empty if any bound is not finite.
pub(crate) fn integer_cells(
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
) -> impl Iterator<Item = Position> {
    let finite = [min_x, max_x, min_y, max_y].iter().all(|v| v.is_finite());
    let (x0, x1, y0, y1) = if finite {
        (
            min_x.ceil() as i64,
            max_x.floor() as i64,
            min_y.ceil() as i64,
            max_y.floor() as i64,
        )
    } else {
        (0, -1, 0, -1)
    };
    (x0..=x1).flat_map(move |x| (y0..=y1).map(move |y| Position::new(x as f64, y as f64)))
}

/// One of the three grid strategies.
///
/// Rooms hold an `AnyGrid` so that hex-specific data (cube forms for
/// events, rings, spirals) is reachable by matching the variant.
#[derive(Clone, Debug, PartialEq)]
pub enum AnyGrid {
    /// See [`SquareGrid`].
    Square(SquareGrid),
    /// See [`HexGrid`].
    Hex(HexGrid),
    /// See [`GridlessGrid`].
    Gridless(GridlessGrid),
}

impl AnyGrid {
    /// The hex strategy, if this is a hex grid.
    pub fn as_hex(&self) -> Option<&HexGrid> {
        match self {
            Self::Hex(hex) => Some(hex),
            _ => None,
        }
    }

    /// The gridless strategy, if this is a gridless grid.
    pub fn as_gridless(&self) -> Option<&GridlessGrid> {
        match self {
            Self::Gridless(g) => Some(g),
            _ => None,
        }
    }

    /// Cube form of `pos` on hex grids, `None` otherwise.
    pub fn cube_of(&self, pos: Position) -> Option<CubeCoordinate> {
        self.as_hex().map(|hex| hex.cube_of(pos))
    }

    fn inner(&self) -> &dyn Grid {
        match self {
            Self::Square(g) => g,
            Self::Hex(g) => g,
            Self::Gridless(g) => g,
        }
    }
}

impl From<SquareGrid> for AnyGrid {
    fn from(g: SquareGrid) -> Self {
        Self::Square(g)
    }
}

impl From<HexGrid> for AnyGrid {
    fn from(g: HexGrid) -> Self {
        Self::Hex(g)
    }
}

impl From<GridlessGrid> for AnyGrid {
    fn from(g: GridlessGrid) -> Self {
        Self::Gridless(g)
    }
}

impl Grid for AnyGrid {
    fn shape(&self) -> GridShape {
        self.inner().shape()
    }

    fn dimensions(&self) -> Dimensions {
        self.inner().dimensions()
    }

    fn is_valid_position(&self, pos: Position) -> bool {
        self.inner().is_valid_position(pos)
    }

    fn distance(&self, from: Position, to: Position) -> f64 {
        self.inner().distance(from, to)
    }

    fn neighbors(&self, pos: Position) -> SmallVec<[Position; 8]> {
        self.inner().neighbors(pos)
    }

    fn is_adjacent(&self, a: Position, b: Position) -> bool {
        self.inner().is_adjacent(a, b)
    }

    fn line_of_sight(&self, from: Position, to: Position) -> Vec<Position> {
        self.inner().line_of_sight(from, to)
    }

    fn positions_in_range(&self, center: Position, radius: f64) -> Vec<Position> {
        self.inner().positions_in_range(center, radius)
    }

    fn positions_in_rectangle(&self, rect: &Rectangle) -> Vec<Position> {
        self.inner().positions_in_rectangle(rect)
    }

    fn positions_in_circle(&self, circle: &Circle) -> Vec<Position> {
        self.inner().positions_in_circle(circle)
    }

    fn positions_in_line(&self, from: Position, to: Position) -> Vec<Position> {
        self.inner().positions_in_line(from, to)
    }

    fn positions_in_cone(
        &self,
        origin: Position,
        direction: Position,
        length: f64,
        angle: f64,
    ) -> Vec<Position> {
        self.inner()
            .positions_in_cone(origin, direction, length, angle)
    }
}
