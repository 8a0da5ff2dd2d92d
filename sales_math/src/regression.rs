//! Temporal correlation and least-squares trend lines
//!
//! Contains:
//! - Pearson correlation between two series (and against the period index)
//! - Ordinary least squares slope
//! - A fitted Linear Regression with intercept and R-squared
//!
//! Correlation and slope helpers never fail: degenerate input (fewer than two
//! points, zero variance) yields 0 so a flat or single-period series reads as
//! "no trend" rather than `NaN`.

use crate::{MathError, Result};

/// Spread below this fraction of a series' sum of squares counts as none
const RELATIVE_SPREAD_EPSILON: f64 = 1e-12;

fn sum_of_squares(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum()
}

// Scale-relative, so small-magnitude series keep their trend
fn negligible_spread(spread: f64, values: &[f64]) -> bool {
    spread.abs() <= RELATIVE_SPREAD_EPSILON * sum_of_squares(values)
}

/// Pearson correlation coefficient between `x` and `y`
///
/// Returns 0 when the series have fewer than 2 paired points or either side
/// has zero variance. The result is bounded to [-1, 1].
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }

    let x = &x[..n];
    let y = &y[..n];
    let x_mean = x.iter().sum::<f64>() / n as f64;
    let y_mean = y.iter().sum::<f64>() / n as f64;

    let mut covariance = 0.0;
    let mut x_variance = 0.0;
    let mut y_variance = 0.0;

    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        covariance += dx * dy;
        x_variance += dx * dx;
        y_variance += dy * dy;
    }

    if negligible_spread(x_variance, x) || negligible_spread(y_variance, y) {
        return 0.0;
    }

    (covariance / (x_variance.sqrt() * y_variance.sqrt())).clamp(-1.0, 1.0)
}

/// Correlation between the period index (0..n-1) and the values
pub fn index_correlation(values: &[f64]) -> f64 {
    pearson_correlation(&index_axis(values.len()), values)
}

/// Ordinary least squares slope of `y` against `x`
///
/// Returns 0 with fewer than 2 points or when `x` has no spread.
pub fn ols_slope(x: &[f64], y: &[f64]) -> f64 {
    match LinearRegression::fit(x, y) {
        Ok(regression) => regression.slope(),
        Err(_) => 0.0,
    }
}

/// OLS slope of the values against the period index (0..n-1)
pub fn index_slope(values: &[f64]) -> f64 {
    ols_slope(&index_axis(values.len()), values)
}

fn index_axis(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}

/// Linear Regression fitted over paired observations
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression {
    slope: f64,
    intercept: f64,
    r_squared: Option<f64>,
    observations: usize,
}

impl LinearRegression {
    /// Fit `y = slope * x + intercept` by least squares
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(MathError::InvalidInput(format!(
                "x length ({}) doesn't match y length ({})",
                x.len(),
                y.len()
            )));
        }

        if x.len() < 2 {
            return Err(MathError::InsufficientData(
                "Not enough data for regression. Need at least 2 points.".to_string(),
            ));
        }

        let n = x.len() as f64;

        // Calculate means
        let x_mean = x.iter().sum::<f64>() / n;
        let y_mean = y.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for (&xi, &yi) in x.iter().zip(y) {
            numerator += (xi - x_mean) * (yi - y_mean);
            denominator += (xi - x_mean) * (xi - x_mean);
        }

        if negligible_spread(denominator, x) {
            return Err(MathError::CalculationError(
                "Cannot calculate slope: x values are too similar".to_string(),
            ));
        }

        let slope = numerator / denominator;
        let intercept = y_mean - slope * x_mean;

        let mut ss_total = 0.0; // total sum of squares
        let mut ss_residual = 0.0; // residual sum of squares

        for (&xi, &yi) in x.iter().zip(y) {
            let predicted = slope * xi + intercept;
            ss_total += (yi - y_mean).powi(2);
            ss_residual += (yi - predicted).powi(2);
        }

        let r_squared = if negligible_spread(ss_total, y) {
            None
        } else {
            Some(1.0 - ss_residual / ss_total)
        };

        Ok(Self {
            slope,
            intercept,
            r_squared,
            observations: x.len(),
        })
    }

    /// Get the slope (trend direction and strength)
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Get the intercept
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Coefficient of determination; `None` when `y` has no variance
    pub fn r_squared(&self) -> Option<f64> {
        self.r_squared
    }

    /// Number of observations used in the fit
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Evaluate the fitted line at `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}
