//! Recency weighting for blended averages

use crate::{MathError, Result};

/// Exponential weights rising toward the most recent observation
///
/// Returns `exp(linspace(-1, 0, n))`: the oldest observation receives
/// `e^-1`, the most recent receives 1. A single observation gets `e^-1`
/// (the start of a one-point linspace), which makes no difference to a
/// weighted average.
pub fn recency_weights(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![(-1.0_f64).exp()],
        _ => {
            let step = 1.0 / (n - 1) as f64;
            (0..n).map(|i| (-1.0 + i as f64 * step).exp()).collect()
        }
    }
}

/// Weighted arithmetic mean
///
/// The only normalization is the weighted-average denominator.
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> Result<f64> {
    if values.len() != weights.len() {
        return Err(MathError::InvalidInput(format!(
            "Values length ({}) doesn't match weights length ({})",
            values.len(),
            weights.len()
        )));
    }

    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot calculate weighted mean of an empty series".to_string(),
        ));
    }

    let weight_sum: f64 = weights.iter().sum();
    if weight_sum.abs() < 1e-12 {
        return Err(MathError::CalculationError(
            "Weights sum to zero".to_string(),
        ));
    }

    let weighted: f64 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
    Ok(weighted / weight_sum)
}
