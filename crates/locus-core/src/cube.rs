//! Hex cube coordinates and grid orientation.
//!
//! A cube coordinate names a hex cell with three axes constrained by
//! `x + y + z == 0`. Every constructor and arithmetic operation here
//! preserves that constraint; [`CubeCoordinate::round`] restores it for
//! interpolated points.

use crate::geometry::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The six unit steps between adjacent hexes, in fixed order.
pub const CUBE_DIRECTIONS: [CubeCoordinate; 6] = [
    CubeCoordinate { x: 1, y: -1, z: 0 },
    CubeCoordinate { x: 1, y: 0, z: -1 },
    CubeCoordinate { x: 0, y: 1, z: -1 },
    CubeCoordinate { x: -1, y: 1, z: 0 },
    CubeCoordinate { x: -1, y: 0, z: 1 },
    CubeCoordinate { x: 0, y: -1, z: 1 },
];

/// Orientation of a hex grid.
///
/// Orientation only matters when converting to and from offset
/// coordinates; the two conversions are not interchangeable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HexOrientation {
    /// Pointed top; offset coordinates are "odd-q".
    #[default]
    PointyTop,
    /// Flat top; offset coordinates are "odd-r".
    FlatTop,
}

impl HexOrientation {
    /// Returns `true` for [`HexOrientation::PointyTop`].
    pub fn is_pointy_top(self) -> bool {
        matches!(self, Self::PointyTop)
    }
}

impl fmt::Display for HexOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PointyTop => f.write_str("pointy-top"),
            Self::FlatTop => f.write_str("flat-top"),
        }
    }
}

/// A hex cell in cube coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CubeCoordinate {
    /// Cube x axis.
    pub x: i32,
    /// Cube y axis.
    pub y: i32,
    /// Cube z axis.
    pub z: i32,
}

impl CubeCoordinate {
    /// The origin hex.
    pub const ORIGIN: CubeCoordinate = CubeCoordinate { x: 0, y: 0, z: 0 };

    /// Create a cube coordinate from its `x` and `z` axes, deriving `y`.
    pub const fn from_xz(x: i32, z: i32) -> Self {
        Self { x, y: -x - z, z }
    }

    /// Returns `true` if `x + y + z == 0`.
    pub fn is_valid(self) -> bool {
        self.x + self.y + self.z == 0
    }

    /// Hex distance: `(|dx| + |dy| + |dz|) / 2`.
    pub fn distance(self, other: CubeCoordinate) -> u32 {
        let d = self.sub(other);
        (d.x.unsigned_abs() + d.y.unsigned_abs() + d.z.unsigned_abs()) / 2
    }

    /// Component-wise sum.
    pub fn add(self, other: CubeCoordinate) -> CubeCoordinate {
        CubeCoordinate {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }

    /// Component-wise difference.
    pub fn sub(self, other: CubeCoordinate) -> CubeCoordinate {
        CubeCoordinate {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }

    /// Multiply every axis by `factor`.
    pub fn scale(self, factor: i32) -> CubeCoordinate {
        CubeCoordinate {
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
        }
    }

    /// The six adjacent hexes in [`CUBE_DIRECTIONS`] order.
    pub fn neighbors(self) -> [CubeCoordinate; 6] {
        CUBE_DIRECTIONS.map(|dir| self.add(dir))
    }

    /// Round a fractional cube point to the nearest hex.
    ///
    /// Each axis is rounded independently, then the axis with the largest
    /// rounding error is recomputed from the other two so the result keeps
    /// `x + y + z == 0`.
    pub fn round(x: f64, y: f64, z: f64) -> CubeCoordinate {
        let mut rx = x.round();
        let mut ry = y.round();
        let mut rz = z.round();

        let dx = (rx - x).abs();
        let dy = (ry - y).abs();
        let dz = (rz - z).abs();

        if dx > dy && dx > dz {
            rx = -ry - rz;
        } else if dy > dz {
            ry = -rx - rz;
        } else {
            rz = -rx - ry;
        }

        CubeCoordinate {
            x: rx as i32,
            y: ry as i32,
            z: rz as i32,
        }
    }

    /// Hexes on the straight line from `self` to `other`, both inclusive.
    ///
    /// Samples `distance + 1` evenly spaced points along the linear
    /// interpolation of the two endpoints and rounds each to a hex.
    pub fn line_to(self, other: CubeCoordinate) -> Vec<CubeCoordinate> {
        let n = self.distance(other);
        if n == 0 {
            return vec![self];
        }
        let lerp = |a: i32, b: i32, t: f64| a as f64 + (b - a) as f64 * t;
        (0..=n)
            .map(|i| {
                let t = i as f64 / n as f64;
                CubeCoordinate::round(
                    lerp(self.x, other.x, t),
                    lerp(self.y, other.y, t),
                    lerp(self.z, other.z, t),
                )
            })
            .collect()
    }

    /// Convert to offset coordinates under `orientation`.
    ///
    /// Pointy-top uses "odd-q" (`col = x`), flat-top uses "odd-r"
    /// (`row = z`).
    pub fn to_offset(self, orientation: HexOrientation) -> Position {
        match orientation {
            HexOrientation::PointyTop => {
                let col = self.x;
                let row = self.z + (self.x - (self.x & 1)) / 2;
                Position::new(col as f64, row as f64)
            }
            HexOrientation::FlatTop => {
                let col = self.x + (self.z - (self.z & 1)) / 2;
                let row = self.z;
                Position::new(col as f64, row as f64)
            }
        }
    }

    /// Convert offset coordinates under `orientation` back to cube form.
    ///
    /// Inverse of [`to_offset`](Self::to_offset) for the same orientation.
    /// Fractional components are truncated.
    pub fn from_offset(pos: Position, orientation: HexOrientation) -> CubeCoordinate {
        let col = pos.x as i32;
        let row = pos.y as i32;
        match orientation {
            HexOrientation::PointyTop => {
                CubeCoordinate::from_xz(col, row - (col - (col & 1)) / 2)
            }
            HexOrientation::FlatTop => {
                CubeCoordinate::from_xz(col - (row - (row & 1)) / 2, row)
            }
        }
    }
}

impl fmt::Display for CubeCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
