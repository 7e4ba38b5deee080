//! Continuous "theater of the mind" space.

use crate::grid::{Cone, Grid};
use crate::sampling::SamplingConfig;
use locus_core::{Dimensions, GridShape, Position, Rectangle};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::f64::consts::{FRAC_PI_4, PI, TAU};

/// Construction parameters for a [`GridlessGrid`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GridlessConfig {
    /// Extent along `x`.
    pub width: f64,
    /// Extent along `y`.
    pub height: f64,
    /// Sample spacing for area queries.
    #[serde(default)]
    pub sampling: SamplingConfig,
}

impl GridlessConfig {
    /// A `width x height` area with default sampling.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            sampling: SamplingConfig::default(),
        }
    }

    /// Replace the sampling parameters.
    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }
}

/// Continuous space with Euclidean distance.
///
/// Any finite point with `0 <= x <= width` and `0 <= y <= height` is valid
/// (both bounds inclusive). Area queries cannot enumerate a continuum, so
/// they return points sampled on a lattice whose spacing adapts to the
/// queried area (see [`SamplingConfig`]).
#[derive(Clone, Debug, PartialEq)]
pub struct GridlessGrid {
    dimensions: Dimensions,
    sampling: SamplingConfig,
}

impl GridlessGrid {
    /// Create a gridless space.
    pub fn new(config: GridlessConfig) -> Self {
        Self {
            dimensions: Dimensions::new(config.width, config.height),
            sampling: config.sampling,
        }
    }

    /// Sampling parameters in use.
    pub fn sampling(&self) -> &SamplingConfig {
        &self.sampling
    }

    /// `pos` if valid, otherwise `pos` clamped into the bounds.
    pub fn nearest_position(&self, pos: Position) -> Position {
        if self.is_valid_position(pos) {
            return pos;
        }
        Position::new(
            pos.x.min(self.dimensions.width).max(0.0),
            pos.y.min(self.dimensions.height).max(0.0),
        )
    }

    /// Sampled points within `radius` of `center` whose bearing lies between
    /// `start_angle` and `end_angle` (radians, counter-clockwise from +x).
    ///
    /// Negative angles are wrapped into `[0, 2π)`. When `end_angle` is
    /// smaller than `start_angle` the arc crosses bearing 0.
    pub fn positions_in_arc(
        &self,
        center: Position,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Vec<Position> {
        if radius.is_nan() || radius < 0.0 || !center.is_finite() {
            return Vec::new();
        }
        let spacing = self
            .sampling
            .spacing_for_area(0.5 * radius * radius * (end_angle - start_angle).abs());
        let start = wrap_angle(start_angle);
        let end = wrap_angle(end_angle);

        self.clipped_lattice(center, radius, spacing)
            .filter(|p| self.distance(center, *p) <= radius)
            .filter(|p| {
                let bearing = wrap_angle((p.y - center.y).atan2(p.x - center.x));
                if end >= start {
                    bearing >= start && bearing <= end
                } else {
                    bearing >= start || bearing <= end
                }
            })
            .collect()
    }

    /// Lattice points with spacing `step` covering the square of half-width
    /// `reach` around `center`, clipped to the bounds.
    fn clipped_lattice(&self, center: Position, reach: f64, step: f64) -> impl Iterator<Item = Position> + '_ {
        lattice(
            (center.x - reach).max(0.0),
            (center.x + reach).min(self.dimensions.width),
            (center.y - reach).max(0.0),
            (center.y + reach).min(self.dimensions.height),
            step,
        )
        .filter(|p| self.is_valid_position(*p))
    }

    /// `center` (if it qualifies) followed by lattice samples within `radius`
    /// that are not within half a spacing of it.
    fn sample_disc(&self, center: Position, radius: f64, spacing: f64) -> Vec<Position> {
        let mut out = Vec::new();
        if self.is_valid_position(center) {
            out.push(center);
        }
        out.extend(self.clipped_lattice(center, radius, spacing).filter(|p| {
            let d = self.distance(center, *p);
            d >= spacing / 2.0 && d <= radius
        }));
        out
    }
}

/// Wrap a negative bearing into `[0, 2π)`.
fn wrap_angle(angle: f64) -> f64 {
    if angle < 0.0 {
        angle.rem_euclid(TAU)
    } else {
        angle
    }
}

/// Points `min + i * step` on each axis up to and including `max`.
/// Empty if the bounds are inverted or not finite, or `step` is not positive.
fn lattice(min_x: f64, max_x: f64, min_y: f64, max_y: f64, step: f64) -> impl Iterator<Item = Position> {
    let count = |min: f64, max: f64| -> i64 {
        if !(min.is_finite() && max.is_finite()) || max < min || step.is_nan() || step <= 0.0 {
            -1
        } else {
            ((max - min) / step + 1e-9).floor() as i64
        }
    };
    let nx = count(min_x, max_x);
    let ny = if nx < 0 { -1 } else { count(min_y, max_y) };
    let nx = if ny < 0 { -1 } else { nx };
    (0..=nx).flat_map(move |i| {
        (0..=ny).map(move |j| Position::new(min_x + i as f64 * step, min_y + j as f64 * step))
    })
}

impl Grid for GridlessGrid {
    fn shape(&self) -> GridShape {
        GridShape::Gridless
    }

    fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    fn is_valid_position(&self, pos: Position) -> bool {
        pos.is_finite()
            && pos.x >= 0.0
            && pos.x <= self.dimensions.width
            && pos.y >= 0.0
            && pos.y <= self.dimensions.height
    }

    fn distance(&self, from: Position, to: Position) -> f64 {
        to.sub(from).length()
    }

    /// Eight points one unit away at 45° steps, starting due east.
    fn neighbors(&self, pos: Position) -> SmallVec<[Position; 8]> {
        (0..8)
            .map(|i| {
                let angle = i as f64 * FRAC_PI_4;
                Position::new(pos.x + angle.cos(), pos.y + angle.sin())
            })
            .filter(|n| self.is_valid_position(*n))
            .collect()
    }

    /// Points every `line_interval` units along the segment, endpoints
    /// included.
    fn line_of_sight(&self, from: Position, to: Position) -> Vec<Position> {
        if from == to {
            return vec![from];
        }
        let samples = (self.distance(from, to) / self.sampling.line_interval).ceil();
        if !samples.is_finite() {
            return Vec::new();
        }
        let n = samples.max(1.0) as u64;
        let delta = to.sub(from);
        (0..=n)
            .map(|i| {
                if i == n {
                    to
                } else {
                    from.add(delta.scale(i as f64 / n as f64))
                }
            })
            .filter(|p| self.is_valid_position(*p))
            .collect()
    }

    /// The center first (when valid), then lattice samples within `radius`.
    fn positions_in_range(&self, center: Position, radius: f64) -> Vec<Position> {
        if radius.is_nan() || radius < 0.0 || !center.is_finite() {
            return Vec::new();
        }
        let spacing = self.sampling.spacing_for_area(PI * radius * radius);
        self.sample_disc(center, radius, spacing)
    }

    fn positions_in_rectangle(&self, rect: &Rectangle) -> Vec<Position> {
        let spacing = self.sampling.spacing_for_area(rect.dimensions.area());
        lattice(
            rect.position.x.max(0.0),
            (rect.position.x + rect.dimensions.width).min(self.dimensions.width),
            rect.position.y.max(0.0),
            (rect.position.y + rect.dimensions.height).min(self.dimensions.height),
            spacing,
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
        if length.is_nan() || length < 0.0 || !origin.is_finite() {
            return Vec::new();
        }
        let Some(cone) = Cone::new(origin, direction, angle) else {
            return Vec::new();
        };
        let spacing = self.sampling.spacing_for_area(length * length * angle.abs() / 2.0);
        self.sample_disc(origin, length, spacing)
            .into_iter()
            .filter(|p| cone.covers(*p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locus_core::Circle;
    use std::f64::consts::FRAC_PI_2;

    fn p(x: f64, y: f64) -> Position {
        Position::new(x, y)
    }

    fn grid(w: f64, h: f64) -> GridlessGrid {
        GridlessGrid::new(GridlessConfig::new(w, h))
    }

    #[test]
    fn bounds_are_inclusive() {
        let g = grid(10.0, 10.0);
        assert!(g.is_valid_position(p(0.0, 0.0)));
        assert!(g.is_valid_position(p(10.0, 10.0)));
        assert!(g.is_valid_position(p(3.25, 7.5)));
        assert!(!g.is_valid_position(p(10.01, 5.0)));
        assert!(!g.is_valid_position(p(f64::NAN, 5.0)));
    }

    #[test]
    fn euclidean_distance() {
        let g = grid(10.0, 10.0);
        assert_eq!(g.distance(p(0.0, 0.0), p(3.0, 4.0)), 5.0);
        assert!(g.is_adjacent(p(1.0, 1.0), p(1.5, 1.5)));
        assert!(!g.is_adjacent(p(1.0, 1.0), p(2.0, 2.0)));
    }

    #[test]
    fn neighbours_are_one_unit_away() {
        let g = grid(10.0, 10.0);
        let n = g.neighbors(p(5.0, 5.0));
        assert_eq!(n.len(), 8);
        assert_eq!(n[0], p(6.0, 5.0));
        for nb in n {
            assert!((g.distance(p(5.0, 5.0), nb) - 1.0).abs() < 1e-12);
        }
        assert_eq!(g.neighbors(p(0.0, 0.0)).len(), 3);
    }

    #[test]
    fn line_samples_every_half_unit() {
        let g = grid(10.0, 10.0);
        let los = g.line_of_sight(p(0.0, 0.0), p(3.0, 4.0));
        assert_eq!(los.len(), 11);
        assert_eq!(los[0], p(0.0, 0.0));
        assert_eq!(los[10], p(3.0, 4.0));
        assert_eq!(g.line_of_sight(p(1.0, 1.0), p(1.0, 1.0)), vec![p(1.0, 1.0)]);
    }

    #[test]
    fn range_includes_center_first() {
        let g = grid(10.0, 10.0);
        let center = p(5.05, 5.05);
        let cells = g.positions_in_range(center, 1.0);
        assert_eq!(cells[0], center);
        assert!(cells.len() > 50);
        assert!(cells.iter().all(|c| g.distance(center, *c) <= 1.0));
        assert!(cells[1..].iter().all(|c| g.distance(center, *c) >= 0.05));
        assert!(g.positions_in_range(center, -1.0).is_empty());
        assert_eq!(g.positions_in_range(center, 0.0), vec![center]);
    }

    #[test]
    fn range_is_clipped_to_bounds() {
        let g = grid(2.0, 2.0);
        let cells = g.positions_in_range(p(0.0, 0.0), 1.5);
        assert!(cells.iter().all(|c| g.is_valid_position(*c)));
        assert_eq!(cells, g.positions_in_circle(&Circle::new(p(0.0, 0.0), 1.5)));
    }

    #[test]
    fn large_range_stays_bounded() {
        let g = grid(1000.0, 1000.0);
        let cells = g.positions_in_range(p(500.0, 500.0), 200.0);
        // spacing caps at 0.5, so roughly π·200²/0.25 samples
        assert!(cells.len() < 600_000, "{} samples", cells.len());
    }

    #[test]
    fn rectangle_samples_inside() {
        let g = grid(10.0, 10.0);
        let rect = Rectangle::new(p(2.0, 2.0), Dimensions::new(1.0, 1.0));
        let cells = g.positions_in_rectangle(&rect);
        assert_eq!(cells.len(), 100);
        assert!(cells.iter().all(|c| rect.contains(*c)));
    }

    #[test]
    fn cone_and_arc_respect_bearing() {
        let g = grid(10.0, 10.0);
        let o = p(5.0, 5.0);
        let cone = g.positions_in_cone(o, p(0.0, 1.0), 2.0, FRAC_PI_2);
        assert_eq!(cone[0], o);
        assert!(cone[1..].iter().all(|c| c.y > o.y));

        let quarter = g.positions_in_arc(o, 2.0, 0.0, FRAC_PI_2);
        assert!(!quarter.is_empty());
        assert!(quarter.iter().all(|c| c.x >= o.x && c.y >= o.y));

        let across_zero = g.positions_in_arc(o, 2.0, -FRAC_PI_4, FRAC_PI_4);
        assert!(!across_zero.is_empty());
        assert!(across_zero.iter().all(|c| c.x >= o.x));
    }

    #[test]
    fn nearest_position_clamps() {
        let g = grid(10.0, 5.0);
        assert_eq!(g.nearest_position(p(3.0, 3.0)), p(3.0, 3.0));
        assert_eq!(g.nearest_position(p(-2.0, 7.0)), p(0.0, 5.0));
        assert_eq!(g.nearest_position(p(12.0, -1.0)), p(10.0, 0.0));
    }

    #[test]
    fn lattice_rejects_bad_input() {
        assert_eq!(lattice(0.0, 1.0, 0.0, 1.0, 0.0).count(), 0);
        assert_eq!(lattice(1.0, 0.0, 0.0, 1.0, 0.5).count(), 0);
        assert_eq!(lattice(0.0, 1.0, 0.0, 1.0, 0.5).count(), 9);
    }
}
