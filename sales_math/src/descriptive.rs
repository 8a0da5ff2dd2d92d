//! Descriptive statistics over metric series
//!
//! Thin, error-returning wrappers around `statrs` so callers decide how a
//! degenerate series is handled instead of receiving `NaN`.

use crate::{MathError, Result};
use statrs::statistics::Statistics;

/// Arithmetic mean of the values
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot calculate mean of an empty series".to_string(),
        ));
    }

    Ok(values.iter().mean())
}

/// Sample standard deviation (n - 1 denominator)
///
/// Needs at least 2 observations.
pub fn sample_std_dev(values: &[f64]) -> Result<f64> {
    if values.len() < 2 {
        return Err(MathError::InsufficientData(format!(
            "Sample standard deviation needs at least 2 points, got {}",
            values.len()
        )));
    }

    let std_dev = values.iter().std_dev();
    if !std_dev.is_finite() {
        return Err(MathError::CalculationError(
            "Standard deviation is not finite".to_string(),
        ));
    }

    Ok(std_dev)
}

/// Mean of the second differences of the series
///
/// Measures whether period-over-period changes are speeding up or slowing
/// down. Series of 3 points or fewer have no meaningful acceleration and
/// yield 0.
pub fn mean_acceleration(values: &[f64]) -> f64 {
    if values.len() <= 3 {
        return 0.0;
    }

    let first: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let second: Vec<f64> = first.windows(2).map(|w| w[1] - w[0]).collect();

    second.iter().sum::<f64>() / second.len() as f64
}
