//! # Sales Owl
//!
//! Workspace facade over the sales forecasting crates.
//!
//! - [`math`]: descriptive statistics, recency weights and regression
//! - [`forecast`]: ledger loading, demand forecasts and financial projections
//!
//! ## Example
//!
//! ```
//! use sales_owl_workspace::forecast::utils::generate_sample_records;
//! use sales_owl_workspace::forecast::{EngineConfig, RecordStore, SalesAnalysis};
//!
//! let store: RecordStore = generate_sample_records(2023, 2, 7).into_iter().collect();
//! let report = SalesAnalysis::new(&store, EngineConfig::default())?.run("2025")?;
//! assert_eq!(report.target_year, 2025);
//! # Ok::<(), sales_owl_workspace::forecast::ForecastError>(())
//! ```

pub use sales_forecast as forecast;
pub use sales_math as math;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facade_reexports() {
        let weights = math::recency_weights(3);
        assert_eq!(weights.len(), 3);
        assert!(!forecast::VERSION.is_empty());
    }
}
