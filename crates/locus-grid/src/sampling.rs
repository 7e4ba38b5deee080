//! Sample spacing for continuous-area queries.

use serde::{Deserialize, Serialize};

/// Controls how densely gridless area queries sample space.
///
/// Spacing is chosen per query so that the number of samples stays near
/// `max_samples`, clamped to `[min_spacing, max_spacing]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Target upper bound on samples per query. Default: 10 000.
    pub max_samples: f64,
    /// Spacing floor, reached by small areas. Default: 0.1.
    pub min_spacing: f64,
    /// Spacing cap, reached by large areas. Default: 0.5.
    pub max_spacing: f64,
    /// Distance between line-of-sight samples. Default: 0.5.
    pub line_interval: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            max_samples: 10_000.0,
            min_spacing: 0.1,
            max_spacing: 0.5,
            line_interval: 0.5,
        }
    }
}

impl SamplingConfig {
    /// Sample spacing for a query covering `area` square units.
    pub fn spacing_for_area(&self, area: f64) -> f64 {
        let raw = (area.max(0.0) / self.max_samples).sqrt();
        if raw.is_nan() {
            return self.max_spacing;
        }
        raw.max(self.min_spacing).min(self.max_spacing)
    }
}
