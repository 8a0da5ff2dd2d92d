//! # Sales Math
//!
//! Statistical building blocks for sales forecasting.
//! This crate provides the numeric pieces the forecasting engine blends
//! together: descriptive statistics, recency weighting, temporal correlation
//! and least-squares trend lines.

use thiserror::Error;

// Calculation modules
pub mod descriptive;
pub mod regression;
pub mod weights;

/// Errors that can occur in sales-related calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for sales math operations
pub type Result<T> = std::result::Result<T, MathError>;

pub use descriptive::{mean, mean_acceleration, sample_std_dev};
pub use regression::{index_correlation, index_slope, ols_slope, pearson_correlation, LinearRegression};
pub use weights::{recency_weights, weighted_mean};
