//! Confidence scores and forecast intervals
//!
//! Intervals are a normal approximation around the point forecast using the
//! historical dispersion of the series (`point ± z × std`). They are not
//! prediction intervals of a fitted model. Series with a single period have
//! no dispersion; a fixed share of the observed value stands in for the
//! standard deviation. Both choices are heuristics.

use crate::config::IntervalConfig;
use sales_math::sample_std_dev;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

/// Confidence level of intervals built with the default z-score
pub const DEFAULT_LEVEL: f64 = 0.95;

/// Two-sided coverage of a standard normal interval of half-width `z`
pub fn coverage(z: f64) -> f64 {
    match Normal::new(0.0, 1.0) {
        Ok(normal) => 2.0 * normal.cdf(z.abs()) - 1.0,
        Err(_) => DEFAULT_LEVEL,
    }
}

/// Symmetric interval around a point forecast, floored at 0
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    pub level: f64,
}

impl ConfidenceInterval {
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Historical dispersion of a series
///
/// Sample standard deviation for two or more values, otherwise
/// `single_point_std_ratio` of the single observed value (0 for no values).
pub fn dispersion(values: &[f64], config: &IntervalConfig) -> f64 {
    match sample_std_dev(values) {
        Ok(std_dev) => std_dev,
        Err(_) => values
            .first()
            .map(|v| v.abs() * config.single_point_std_ratio)
            .unwrap_or(0.0),
    }
}

/// Interval of `point ± z × std_dev`, with the lower bound clamped to 0
pub fn interval(point: f64, std_dev: f64, config: &IntervalConfig) -> ConfidenceInterval {
    let margin = config.z_score * std_dev.abs();
    ConfidenceInterval {
        lower: (point - margin).max(0.0),
        upper: point + margin,
        level: coverage(config.z_score),
    }
}

/// Score-based confidence: `min(|score| × scale, 1)`
pub fn score_confidence(score: f64, scale: f64) -> f64 {
    (score.abs() * scale).min(1.0)
}
