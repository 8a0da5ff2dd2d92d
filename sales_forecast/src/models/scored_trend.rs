//! Trend-extrapolated forecast with a composite trend score

use crate::aggregate::{Granularity, TimeSeries};
use crate::config::{IntervalConfig, ScoredTrendConfig, TrendThresholds};
use crate::confidence::{dispersion, interval, score_confidence};
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastResult, ScoredDetails};
use crate::trend::{estimate_trend_values, TrendStrength};
use sales_math::{index_correlation, index_slope, mean, mean_acceleration};

/// Long-run mean extended by a short-window slope
///
/// The series is summed into `granularity` buckets (quarters by default).
/// With `k` trailing buckets, the short-window slope `s` is the OLS slope of
/// the last `k` values and
///
/// - `forecast = mean + trend_weight × s × horizon`
/// - `score = correlation_weight × correlation + slope_weight × s / mean`
///
/// The score drives the five-level [`TrendStrength`] and the confidence
/// `min(|score| × scale, 1)`.
#[derive(Debug, Clone)]
pub struct ScoredTrend {
    /// Name of the model
    name: String,
    config: ScoredTrendConfig,
    granularity: Granularity,
    thresholds: TrendThresholds,
    intervals: IntervalConfig,
}

impl ScoredTrend {
    /// Create a new scored-trend model
    pub fn new(
        config: ScoredTrendConfig,
        granularity: Granularity,
        thresholds: TrendThresholds,
        intervals: IntervalConfig,
    ) -> Result<Self> {
        if config.short_window == 0 {
            return Err(ForecastError::InvalidParameter(
                "Short window must be positive".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&config.trend_weight) {
            return Err(ForecastError::InvalidParameter(
                "Trend weight must be between 0 and 1".to_string(),
            ));
        }

        Ok(Self {
            name: format!(
                "Scored Trend (window={}, trend weight={})",
                config.short_window, config.trend_weight
            ),
            config,
            granularity,
            thresholds,
            intervals,
        })
    }

    /// Composite score of a full-series correlation and a short-window slope
    ///
    /// The relative-slope term is 0 when the mean is 0.
    pub fn score(&self, correlation: f64, short_window_slope: f64, historical_mean: f64) -> f64 {
        let relative_slope = if historical_mean.abs() < f64::EPSILON {
            0.0
        } else {
            short_window_slope / historical_mean
        };

        self.config.correlation_weight * correlation + self.config.slope_weight * relative_slope
    }

    /// Extrapolated forecast before clamping
    pub fn extrapolate(&self, historical_mean: f64, short_window_slope: f64) -> f64 {
        historical_mean + self.config.trend_weight * short_window_slope * self.config.horizon
    }

    /// Correlation of a revenue series with time, bucketed like the forecast
    pub fn revenue_correlation(&self, revenue: &TimeSeries) -> Result<f64> {
        let buckets = revenue.rebucket(self.granularity)?;
        Ok(index_correlation(&buckets.values()))
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }
}

impl Default for ScoredTrend {
    fn default() -> Self {
        let config = ScoredTrendConfig::default();
        Self {
            name: format!(
                "Scored Trend (window={}, trend weight={})",
                config.short_window, config.trend_weight
            ),
            config,
            granularity: Granularity::Quarter,
            thresholds: TrendThresholds::default(),
            intervals: IntervalConfig::default(),
        }
    }
}

impl ForecastModel for ScoredTrend {
    fn forecast(&self, entity: &str, series: &TimeSeries) -> Result<ForecastResult> {
        let buckets = series.rebucket(self.granularity)?;
        let values = buckets.values();
        if values.is_empty() {
            return Err(ForecastError::ValidationError(format!(
                "Empty series for '{}'",
                entity
            )));
        }

        let trend = estimate_trend_values(&values, &self.thresholds);
        let historical_mean = mean(&values)?;
        let historical_std = dispersion(&values, &self.intervals);

        let window = self.config.short_window.min(values.len());
        let short_window_slope = index_slope(&values[values.len() - window..]);

        let point_estimate = self.extrapolate(historical_mean, short_window_slope).max(0.0);
        let score = self.score(trend.correlation, short_window_slope, historical_mean);
        let strength = TrendStrength::from_score(score, &self.config.thresholds);

        log::debug!(
            "{}: mean {:.2}, short-window slope {:.2}, score {:.4} ({})",
            entity,
            historical_mean,
            short_window_slope,
            score,
            strength
        );

        Ok(ForecastResult {
            entity: entity.to_string(),
            point_estimate,
            interval: interval(point_estimate, historical_std, &self.intervals),
            direction: strength.direction(),
            confidence: score_confidence(score, self.config.confidence_scale),
            historical_mean,
            historical_std,
            trend,
            scored: Some(ScoredDetails {
                score,
                strength,
                short_window_slope,
                acceleration: mean_acceleration(&values),
                revenue_correlation: None,
            }),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
