//! Recency-weighted blend of historical demand

use crate::aggregate::TimeSeries;
use crate::config::{IntervalConfig, RecencyBlendConfig, TrendThresholds};
use crate::confidence::{dispersion, interval};
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastResult};
use crate::trend::estimate_trend_values;
use sales_math::{mean, recency_weights, weighted_mean};

/// Blend of the long-run mean and an exponentially recency-weighted mean
///
/// `forecast = w × mean + (1 - w) × recency_mean`, where the recency weights
/// rise from `e^-1` for the oldest period to 1 for the latest. The long-run
/// share `w` keeps a single-period spike from dominating.
#[derive(Debug, Clone)]
pub struct RecencyBlend {
    /// Name of the model
    name: String,
    /// Weight of the unweighted historical mean
    historical_weight: f64,
    thresholds: TrendThresholds,
    intervals: IntervalConfig,
}

impl RecencyBlend {
    /// Create a new recency blend
    pub fn new(
        config: RecencyBlendConfig,
        thresholds: TrendThresholds,
        intervals: IntervalConfig,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&config.historical_weight) {
            return Err(ForecastError::InvalidParameter(
                "Historical weight must be between 0 and 1".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Recency Blend (historical weight={})", config.historical_weight),
            historical_weight: config.historical_weight,
            thresholds,
            intervals,
        })
    }

    /// Combine the two estimates with the configured weight
    pub fn blend(&self, historical_mean: f64, recency_mean: f64) -> f64 {
        self.historical_weight * historical_mean + (1.0 - self.historical_weight) * recency_mean
    }

    pub fn historical_weight(&self) -> f64 {
        self.historical_weight
    }
}

impl Default for RecencyBlend {
    fn default() -> Self {
        let config = RecencyBlendConfig::default();
        Self {
            name: format!("Recency Blend (historical weight={})", config.historical_weight),
            historical_weight: config.historical_weight,
            thresholds: TrendThresholds::default(),
            intervals: IntervalConfig::default(),
        }
    }
}

impl ForecastModel for RecencyBlend {
    fn forecast(&self, entity: &str, series: &TimeSeries) -> Result<ForecastResult> {
        let values = series.values();
        if values.is_empty() {
            return Err(ForecastError::ValidationError(format!(
                "Empty series for '{}'",
                entity
            )));
        }

        let trend = estimate_trend_values(&values, &self.thresholds);
        let historical_mean = mean(&values)?;
        let recency_mean = weighted_mean(&values, &recency_weights(values.len()))?;
        let point_estimate = self.blend(historical_mean, recency_mean).max(0.0);

        let historical_std = dispersion(&values, &self.intervals);

        log::debug!(
            "{}: mean {:.2}, recency mean {:.2}, forecast {:.2} ({})",
            entity,
            historical_mean,
            recency_mean,
            point_estimate,
            trend.direction
        );

        Ok(ForecastResult {
            entity: entity.to_string(),
            point_estimate,
            interval: interval(point_estimate, historical_std, &self.intervals),
            direction: trend.direction,
            confidence: trend.confidence,
            historical_mean,
            historical_std,
            trend,
            scored: None,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
