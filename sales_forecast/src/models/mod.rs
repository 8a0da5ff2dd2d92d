//! Demand forecasting policies
//!
//! Two blending policies turn an entity's history into a single point
//! forecast for the next period:
//!
//! - [`recency_blend::RecencyBlend`] anchors a recency-weighted mean with the
//!   long-run mean (products, regions, the market).
//! - [`scored_trend::ScoredTrend`] extends the long-run mean by a short-window
//!   slope and scores the trend on five levels (salespeople).
//!
//! [`annual_share`] projects a target calendar year from annual totals and
//! each entity's share of the market.

use crate::aggregate::TimeSeries;
use crate::confidence::ConfidenceInterval;
use crate::error::Result;
use crate::trend::{TrendDirection, TrendResult, TrendStrength};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{self, Debug};

/// Point forecast of one entity with its interval and trend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub entity: String,
    /// Forecast for the next period, never negative
    pub point_estimate: f64,
    pub interval: ConfidenceInterval,
    pub direction: TrendDirection,
    /// Confidence in the classification, within [0, 1]
    pub confidence: f64,
    pub historical_mean: f64,
    pub historical_std: f64,
    pub trend: TrendResult,
    /// Present for scored-trend forecasts
    pub scored: Option<ScoredDetails>,
}

/// Extra outputs of the scored-trend policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredDetails {
    pub score: f64,
    pub strength: TrendStrength,
    pub short_window_slope: f64,
    /// Mean second difference of the bucketed series
    pub acceleration: f64,
    /// Correlation of bucketed revenue with time, when revenue was supplied
    pub revenue_correlation: Option<f64>,
}

impl ForecastResult {
    /// Five-level label when scored, three-level otherwise
    pub fn label(&self) -> String {
        match &self.scored {
            Some(details) => details.strength.to_string(),
            None => self.direction.to_string(),
        }
    }
}

impl fmt::Display for ForecastResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.entity)?;
        writeln!(
            f,
            "  Trend:       {} (confidence {:.1}%)",
            self.label(),
            self.confidence * 100.0
        )?;
        writeln!(f, "  Forecast:    {:.0}", self.point_estimate)?;
        writeln!(
            f,
            "  95% range:   [{:.0} - {:.0}]",
            self.interval.lower, self.interval.upper
        )?;
        writeln!(
            f,
            "  History:     mean {:.0}, std {:.0}",
            self.historical_mean, self.historical_std
        )?;
        Ok(())
    }
}

/// Common interface for demand forecasting policies
pub trait ForecastModel: Debug {
    /// Forecast the next period of one entity's series
    fn forecast(&self, entity: &str, series: &TimeSeries) -> Result<ForecastResult>;

    /// Get the name of the model
    fn name(&self) -> &str;

    /// Forecast every series of a grouping
    fn forecast_all(
        &self,
        series: &BTreeMap<String, TimeSeries>,
    ) -> Result<BTreeMap<String, ForecastResult>> {
        series
            .iter()
            .map(|(entity, s)| Ok((entity.clone(), self.forecast(entity, s)?)))
            .collect()
    }
}

pub mod annual_share;
pub mod recency_blend;
pub mod scored_trend;
