//! Planar geometry primitives shared by every grid strategy.
//!
//! A [`Position`] is interpreted by the grid that owns it: literal Cartesian
//! coordinates for square and gridless rooms, a native cube projection
//! (`x = cube.x`, `y = cube.z`) for hex rooms. Distances are never computed
//! here; they belong to the grid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A point in a room's 2D coordinate space.
///
/// Equality and hashing are bitwise on the coordinates, with `-0.0`
/// normalised to `0.0`, so positions can key the occupancy index.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate (cube `x` on hex grids).
    pub x: f64,
    /// Vertical coordinate (cube `z` on hex grids).
    pub y: f64,
}

impl Position {
    /// Create a position.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise sum.
    pub fn add(self, other: Position) -> Position {
        Position::new(self.x + other.x, self.y + other.y)
    }

    /// Component-wise difference.
    pub fn sub(self, other: Position) -> Position {
        Position::new(self.x - other.x, self.y - other.y)
    }

    /// Multiply both components by `factor`.
    pub fn scale(self, factor: f64) -> Position {
        Position::new(self.x * factor, self.y * factor)
    }

    /// Euclidean length of the position treated as a vector.
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction, or the origin for a zero vector.
    pub fn normalize(self) -> Position {
        let len = self.length();
        if len == 0.0 {
            return Position::default();
        }
        Position::new(self.x / len, self.y / len)
    }

    /// Returns `true` at the origin.
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Returns `true` if both components are finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Returns `true` if both components are whole numbers.
    pub fn is_integral(self) -> bool {
        self.is_finite() && self.x.fract() == 0.0 && self.y.fract() == 0.0
    }

    fn bits(self) -> (u64, u64) {
        // Adding 0.0 folds -0.0 into 0.0.
        ((self.x + 0.0).to_bits(), (self.y + 0.0).to_bits())
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// The size of a rectangular area anchored at the origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Extent along `x`.
    pub width: f64,
    /// Extent along `y`.
    pub height: f64,
}

impl Dimensions {
    /// Create dimensions.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// `width * height`.
    pub fn area(self) -> f64 {
        self.width * self.height
    }

    /// Half-open containment: `0 <= x < width && 0 <= y < height`.
    pub fn contains(self, pos: Position) -> bool {
        pos.x >= 0.0 && pos.x < self.width && pos.y >= 0.0 && pos.y < self.height
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An axis-aligned rectangle with its minimum corner at `position`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Minimum corner.
    pub position: Position,
    /// Extent from the minimum corner.
    pub dimensions: Dimensions,
}

impl Rectangle {
    /// Create a rectangle from its minimum corner and size.
    pub const fn new(position: Position, dimensions: Dimensions) -> Self {
        Self {
            position,
            dimensions,
        }
    }

    /// Half-open containment on both axes.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.position.x
            && pos.x < self.position.x + self.dimensions.width
            && pos.y >= self.position.y
            && pos.y < self.position.y + self.dimensions.height
    }

    /// Geometric center.
    pub fn center(&self) -> Position {
        Position::new(
            self.position.x + self.dimensions.width / 2.0,
            self.position.y + self.dimensions.height / 2.0,
        )
    }

    /// Returns `true` if the two rectangles overlap with positive area.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.position.x < other.position.x + other.dimensions.width
            && self.position.x + self.dimensions.width > other.position.x
            && self.position.y < other.position.y + other.dimensions.height
            && self.position.y + self.dimensions.height > other.position.y
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rect[{} {}]", self.position, self.dimensions)
    }
}

/// A circle in Euclidean terms.
///
/// Grids answer circle queries with their own metric; `contains` here is
/// always Euclidean.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Center point.
    pub center: Position,
    /// Radius (inclusive).
    pub radius: f64,
}

impl Circle {
    /// Create a circle.
    pub const fn new(center: Position, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Euclidean containment, boundary inclusive.
    pub fn contains(&self, pos: Position) -> bool {
        self.center.sub(pos).length() <= self.radius
    }

    /// Returns `true` if the circles touch or overlap.
    pub fn intersects(&self, other: &Circle) -> bool {
        self.center.sub(other.center).length() <= self.radius + other.radius
    }
}

impl fmt::Display for Circle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Circle[{} r:{}]", self.center, self.radius)
    }
}

/// The three grid topologies a room can be built on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridShape {
    /// Square cells, Chebyshev distance.
    Square,
    /// Hex cells addressed by cube coordinates.
    Hex,
    /// Continuous space, Euclidean distance.
    Gridless,
}

impl GridShape {
    /// The stable lowercase tag used in events and persisted room data.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Hex => "hex",
            Self::Gridless => "gridless",
        }
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
