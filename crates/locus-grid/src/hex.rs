//! Hexagonal grid addressed by cube coordinates.

use crate::grid::{integer_cells, Cone, Grid};
use locus_core::{
    CubeCoordinate, Dimensions, GridShape, HexOrientation, Position, Rectangle, CUBE_DIRECTIONS,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

const CUBE_AXIS_LIMIT: f64 = (1u32 << 28) as f64;

/// Construction parameters for a [`HexGrid`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HexGridConfig {
    /// Extent of the cube `x` axis.
    pub width: f64,
    /// Extent of the cube `z` axis.
    pub height: f64,
    /// Orientation used for offset conversions.
    #[serde(default)]
    pub orientation: HexOrientation,
}

impl HexGridConfig {
    /// A `width x height` pointy-top grid.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            orientation: HexOrientation::PointyTop,
        }
    }

    /// Replace the orientation.
    pub fn with_orientation(mut self, orientation: HexOrientation) -> Self {
        self.orientation = orientation;
        self
    }
}

/// A hex grid whose positions are cube coordinates projected onto two axes.
///
/// A [`Position`] on this grid stores `x = cube.x` and `y = cube.z`; the
/// third axis is derived so that `x + y + z == 0` always holds. Valid
/// positions are whole numbers with `0 <= x < width` and `0 <= y < height`.
/// Distance is cube distance, so an interior cell has 6 neighbours.
///
/// Orientation only affects [`to_offset`](HexGrid::to_offset) and
/// [`from_offset`](HexGrid::from_offset).
///
/// # Examples
///
/// ```
/// use locus_core::Position;
/// use locus_grid::{Grid, HexGrid, HexGridConfig};
///
/// let hex = HexGrid::new(HexGridConfig::new(10.0, 10.0));
/// let a = Position::new(5.0, 5.0);
/// assert_eq!(hex.distance(a, Position::new(6.0, 5.0)), 1.0);
/// assert_eq!(hex.distance(a, Position::new(6.0, 6.0)), 2.0);
/// assert_eq!(hex.neighbors(a).len(), 6);
/// assert_eq!(hex.ring(a, 2).len(), 12);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HexGrid {
    dimensions: Dimensions,
    orientation: HexOrientation,
}

impl HexGrid {
    /// Create a hex grid.
    pub fn new(config: HexGridConfig) -> Self {
        Self {
            dimensions: Dimensions::new(config.width, config.height),
            orientation: config.orientation,
        }
    }

    /// Configured orientation.
    pub fn orientation(&self) -> HexOrientation {
        self.orientation
    }

    /// Cube form of a position on this grid. Fractions are truncated and
    /// each axis is clamped to `±2^28`, which keeps every cube difference
    /// and distance within `i32`.
    pub fn cube_of(&self, pos: Position) -> CubeCoordinate {
        let axis = |v: f64| v.clamp(-CUBE_AXIS_LIMIT, CUBE_AXIS_LIMIT) as i32;
        CubeCoordinate::from_xz(axis(pos.x), axis(pos.y))
    }

    /// Position form of a cube coordinate.
    pub fn position_of(&self, cube: CubeCoordinate) -> Position {
        Position::new(cube.x as f64, cube.z as f64)
    }

    /// Returns `true` if `cube` lies inside the grid.
    pub fn contains_cube(&self, cube: CubeCoordinate) -> bool {
        cube.is_valid() && self.is_valid_position(self.position_of(cube))
    }

    /// The six cube neighbours of `pos`, in direction order, unfiltered.
    pub fn cube_neighbors(&self, pos: Position) -> [CubeCoordinate; 6] {
        self.cube_of(pos).neighbors()
    }

    /// Offset coordinates of `pos` under this grid's orientation.
    pub fn to_offset(&self, pos: Position) -> Position {
        self.cube_of(pos).to_offset(self.orientation)
    }

    /// Position addressed by `offset` under this grid's orientation.
    pub fn from_offset(&self, offset: Position) -> Position {
        self.position_of(CubeCoordinate::from_offset(offset, self.orientation))
    }

    /// Valid cells at exactly `radius` steps from `center`.
    ///
    /// Radius 0 yields the center alone. Cells are produced walking the
    /// ring from the corner in direction 4, then around through the six
    /// directions in order. A radius past the far edge of the grid yields
    /// nothing.
    pub fn ring(&self, center: Position, radius: u32) -> Vec<Position> {
        let origin = self.cube_of(center);
        match self.reach_from(origin) {
            Some(reach) if i64::from(radius) <= reach => self.ring_at(origin, i64::from(radius)),
            _ => Vec::new(),
        }
    }

    /// Valid cells within `radius` steps of `center`, ring by ring.
    pub fn spiral(&self, center: Position, radius: u32) -> Vec<Position> {
        let origin = self.cube_of(center);
        let Some(reach) = self.reach_from(origin) else {
            return Vec::new();
        };
        (0..=i64::from(radius).min(reach))
            .flat_map(|r| self.ring_at(origin, r))
            .collect()
    }

    /// Whole cells along each axis, as `(columns, rows)`.
    fn cell_extent(&self) -> (i64, i64) {
        let cells = |extent: f64| extent.ceil().clamp(0.0, i32::MAX as f64) as i64;
        (cells(self.dimensions.width), cells(self.dimensions.height))
    }

    /// Steps from `origin` to the farthest cell of the grid, or `None` for
    /// a grid with no cells. Cube distance is a norm, so the farthest cell
    /// is a corner.
    fn reach_from(&self, origin: CubeCoordinate) -> Option<i64> {
        let (cols, rows) = self.cell_extent();
        if cols == 0 || rows == 0 {
            return None;
        }
        [(0, 0), (cols - 1, 0), (0, rows - 1), (cols - 1, rows - 1)]
            .into_iter()
            .map(|(x, z)| steps(origin, x, z))
            .max()
    }

    /// Valid cells within `r` steps of `origin`, each with its distance.
    ///
    /// Only the part of the cube bounding box that overlaps the grid is
    /// visited, columns first.
    fn cells_near(&self, origin: CubeCoordinate, r: i64) -> Vec<(Position, i64)> {
        let (cols, rows) = self.cell_extent();
        let (ox, oz) = (i64::from(origin.x), i64::from(origin.z));
        let mut out = Vec::new();
        for x in (ox - r).max(0)..=(ox + r).min(cols - 1) {
            let dx = x - ox;
            let lo = (oz - r).max(oz - r - dx).max(0);
            let hi = (oz + r).min(oz + r - dx).min(rows - 1);
            for z in lo..=hi {
                let pos = Position::new(x as f64, z as f64);
                if self.is_valid_position(pos) {
                    out.push((pos, steps(origin, x, z)));
                }
            }
        }
        out
    }

    /// Ring of radius `r`, which must not exceed the grid's reach from
    /// `origin`. Small rings are walked; rings longer than the area they
    /// overlap are picked out of that area and put in walk order.
    fn ring_at(&self, origin: CubeCoordinate, r: i64) -> Vec<Position> {
        if r == 0 {
            return self.cells_near(origin, 0).into_iter().map(|(p, _)| p).collect();
        }
        let (cols, rows) = self.cell_extent();
        let side = 2 * r + 1;
        if 6 * r <= side.min(cols) * side.min(rows) {
            return self.walk_ring(origin, r);
        }
        let mut cells: Vec<(Position, i64)> = self
            .cells_near(origin, r)
            .into_iter()
            .filter(|&(_, d)| d == r)
            .filter_map(|(p, _)| ring_index(origin, r, p.x as i64, p.y as i64).map(|i| (p, i)))
            .collect();
        cells.sort_by_key(|&(_, i)| i);
        cells.into_iter().map(|(p, _)| p).collect()
    }

    fn walk_ring(&self, origin: CubeCoordinate, r: i64) -> Vec<Position> {
        let corner = CUBE_DIRECTIONS[4];
        let mut x = i64::from(origin.x) + i64::from(corner.x) * r;
        let mut z = i64::from(origin.z) + i64::from(corner.z) * r;
        let mut out = Vec::new();
        for dir in CUBE_DIRECTIONS {
            for _ in 0..r {
                let pos = Position::new(x as f64, z as f64);
                if self.is_valid_position(pos) {
                    out.push(pos);
                }
                x += i64::from(dir.x);
                z += i64::from(dir.z);
            }
        }
        out
    }
}

/// Cube distance from `origin` to the cell at `(x, z)`, without overflow.
fn steps(origin: CubeCoordinate, x: i64, z: i64) -> i64 {
    let dx = x - i64::from(origin.x);
    let dz = z - i64::from(origin.z);
    let dy = -dx - dz;
    (dx.abs() + dy.abs() + dz.abs()) / 2
}

/// Position of `(x, z)` along the ring walk of radius `r` around `origin`.
fn ring_index(origin: CubeCoordinate, r: i64, x: i64, z: i64) -> Option<i64> {
    let corner = CUBE_DIRECTIONS[4];
    let mut cx = i64::from(origin.x) + i64::from(corner.x) * r;
    let mut cz = i64::from(origin.z) + i64::from(corner.z) * r;
    for (side, dir) in CUBE_DIRECTIONS.iter().enumerate() {
        let (ux, uz) = (i64::from(dir.x), i64::from(dir.z));
        let (ex, ez) = (x - cx, z - cz);
        // Every direction has a unit component on x or z.
        let t = if ux != 0 { ex * ux } else { ez * uz };
        if (0..r).contains(&t) && ex == ux * t && ez == uz * t {
            return Some(side as i64 * r + t);
        }
        cx += ux * r;
        cz += uz * r;
    }
    None
}

impl Grid for HexGrid {
    fn shape(&self) -> GridShape {
        GridShape::Hex
    }

    fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    fn is_valid_position(&self, pos: Position) -> bool {
        pos.is_integral() && self.dimensions.contains(pos)
    }

    fn distance(&self, from: Position, to: Position) -> f64 {
        self.cube_of(from).distance(self.cube_of(to)) as f64
    }

    fn neighbors(&self, pos: Position) -> SmallVec<[Position; 8]> {
        self.cube_neighbors(pos)
            .into_iter()
            .map(|c| self.position_of(c))
            .filter(|n| self.is_valid_position(*n))
            .collect()
    }

    fn line_of_sight(&self, from: Position, to: Position) -> Vec<Position> {
        if from == to {
            return vec![from];
        }
        self.cube_of(from)
            .line_to(self.cube_of(to))
            .into_iter()
            .map(|c| self.position_of(c))
            .filter(|p| self.is_valid_position(*p))
            .collect()
    }

    /// Cells within `floor(radius)` cube steps of `center`, clipped to the
    /// grid.
    fn positions_in_range(&self, center: Position, radius: f64) -> Vec<Position> {
        if radius.is_nan() || radius < 0.0 || !center.is_finite() {
            return Vec::new();
        }
        let origin = self.cube_of(center);
        let Some(reach) = self.reach_from(origin) else {
            return Vec::new();
        };
        let r = radius.floor().min(reach as f64) as i64;
        self.cells_near(origin, r).into_iter().map(|(p, _)| p).collect()
    }

    /// Cells whose projected position falls inside `rect`. Rectangles do not
    /// follow hex geometry, so this is an axis-aligned selection.
    fn positions_in_rectangle(&self, rect: &Rectangle) -> Vec<Position> {
        integer_cells(
            rect.position.x.max(0.0),
            (rect.position.x + rect.dimensions.width).min(self.dimensions.width),
            rect.position.y.max(0.0),
            (rect.position.y + rect.dimensions.height).min(self.dimensions.height),
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
