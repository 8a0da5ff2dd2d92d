//! # Sales Forecast
//!
//! Demand forecasting and financial projection over a sales ledger.
//!
//! ## Features
//!
//! - Ledger loading from CSV (current and legacy headers)
//! - Per-entity time series at month, quarter or year granularity
//! - Correlation-based trend classification
//! - Two blending policies: recency blend (products, regions) and scored
//!   trend (salespeople)
//! - Annual market projection from each salesperson's share of volume
//! - Revenue, cost and profit projections with trend-adjusted unit economics
//! - Percentage shares and conditional product distributions
//!
//! Every blend weight and threshold lives in [`config::EngineConfig`].
//!
//! ## Quick Start
//!
//! ```rust
//! use sales_forecast::utils::generate_sample_records;
//! use sales_forecast::{EngineConfig, RecordStore, SalesAnalysis};
//!
//! let store: RecordStore = generate_sample_records(2022, 3, 42).into_iter().collect();
//! let analysis = SalesAnalysis::new(&store, EngineConfig::default())?;
//! let report = analysis.run("2025")?;
//!
//! for (product, forecast) in &report.products {
//!     assert!(forecast.point_estimate >= 0.0);
//!     println!("{}: {:.0} ({})", product, forecast.point_estimate, forecast.label());
//! }
//! # Ok::<(), sales_forecast::ForecastError>(())
//! ```

pub mod aggregate;
pub mod analysis;
pub mod confidence;
pub mod config;
pub mod data;
pub mod error;
pub mod financial;
pub mod models;
pub mod shares;
pub mod trend;
pub mod utils;

// Re-export commonly used types
pub use crate::aggregate::{aggregate, Granularity, HistoricalTotals, Period, TimeSeries};
pub use crate::analysis::{AnalysisReport, SalesAnalysis};
pub use crate::config::EngineConfig;
pub use crate::data::{DataLoader, EntityKind, Metric, RecordStore, SalesRecord};
pub use crate::error::{ForecastError, Result};
pub use crate::financial::{FinancialAdjuster, FinancialProjection, FinancialSummary};
pub use crate::models::{ForecastModel, ForecastResult};
pub use crate::shares::{normalize_shares, ShareDistribution};
pub use crate::trend::{TrendDirection, TrendResult, TrendStrength};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
