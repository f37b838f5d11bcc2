//! Flannery appearance-compensated radius scaling.
//!
//! Circle area is perceived smaller than it is, so radii grow with the
//! 0.5715 power of the value ratio instead of the square root. The same
//! scaler sizes map symbols and legend circles, so both always agree.

use crate::error::{HeatmapError, Result};

pub const FLANNERY_COEFFICIENT: f64 = 1.0083;
pub const FLANNERY_EXPONENT: f64 = 0.5715;
pub const DEFAULT_MIN_RADIUS: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusScaler {
    min_radius: f64,
}

impl Default for RadiusScaler {
    fn default() -> Self {
        Self {
            min_radius: DEFAULT_MIN_RADIUS,
        }
    }
}

impl RadiusScaler {
    /// `min_radius` must be positive and finite; anything else falls back to
    /// the default baseline.
    pub fn new(min_radius: f64) -> Self {
        if min_radius.is_finite() && min_radius > 0.0 {
            Self { min_radius }
        } else {
            Self::default()
        }
    }

    pub const fn min_radius(&self) -> f64 {
        self.min_radius
    }

    /// `1.0083 * (value / global_min)^0.5715 * min_radius`.
    pub fn radius(&self, value: f64, global_min: f64) -> Result<f64> {
        if !global_min.is_finite() || global_min <= 0.0 {
            return Err(HeatmapError::InvalidScale { global_min });
        }
        if !value.is_finite() || value < 0.0 {
            return Err(HeatmapError::InvalidValue {
                feature: "scale input".to_string(),
                attribute: "value".to_string(),
                reason: format!("{value} cannot be scaled"),
            });
        }

        Ok(FLANNERY_COEFFICIENT * (value / global_min).powf(FLANNERY_EXPONENT) * self.min_radius)
    }
}

/// Radius with the default baseline of 6 units.
pub fn radius(value: f64, global_min: f64) -> Result<f64> {
    RadiusScaler::default().radius(value, global_min)
}
