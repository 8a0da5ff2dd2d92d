//! Engine tuning parameters
//!
//! Every blend weight and threshold of the engine is a named constant here
//! and a field of [`EngineConfig`], so it can be tuned from a JSON file or
//! exercised in tests without touching the forecasting code. Missing JSON
//! fields fall back to the defaults below.

use crate::aggregate::Granularity;
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Correlation above which a series is classified as growing
pub const GROWTH_CORRELATION: f64 = 0.1;
/// Correlation below which a series is classified as declining
pub const DECLINE_CORRELATION: f64 = -0.1;

/// Weight of the unweighted historical mean in the recency blend
pub const HISTORICAL_WEIGHT: f64 = 0.3;

/// Weight of the short-window slope in the scored-trend forecast
pub const TREND_WEIGHT: f64 = 0.7;
/// Number of buckets the short-window slope is projected across
pub const TREND_HORIZON: f64 = 4.0;
/// Number of trailing buckets used for the short-window slope
pub const SHORT_WINDOW: usize = 4;
/// Weight of the full-series correlation in the trend score
pub const SCORE_CORRELATION_WEIGHT: f64 = 0.4;
/// Weight of the relative short-window slope in the trend score
pub const SCORE_SLOPE_WEIGHT: f64 = 0.6;
/// Multiplier turning a trend score into a confidence
pub const SCORE_CONFIDENCE_SCALE: f64 = 10.0;

/// Two-sided 95% normal quantile
pub const Z_95: f64 = 1.96;
/// Standard deviation stand-in for single-period series, as a share of the value
pub const SINGLE_POINT_STD_RATIO: f64 = 0.2;

/// Quantity multiplier for entities without a forecast
pub const FALLBACK_QUANTITY_GROWTH: f64 = 1.1;

/// Weight of share-of-market knowledge in the annual projection
pub const MARKET_SHARE_WEIGHT: f64 = 0.6;
/// Weight of the entity's own extrapolated trend in the annual projection
pub const OWN_TREND_WEIGHT: f64 = 0.4;

/// Correlation thresholds for the three-level classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendThresholds {
    pub growth: f64,
    pub decline: f64,
}

impl Default for TrendThresholds {
    fn default() -> Self {
        Self {
            growth: GROWTH_CORRELATION,
            decline: DECLINE_CORRELATION,
        }
    }
}

/// Score thresholds for the five-level classification, in descending order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreThresholds {
    pub strong_growth: f64,
    pub growth: f64,
    pub stable: f64,
    pub decline: f64,
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self {
            strong_growth: 0.1,
            growth: 0.05,
            stable: -0.05,
            decline: -0.1,
        }
    }
}

/// Recency-blend forecaster settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecencyBlendConfig {
    pub historical_weight: f64,
}

impl Default for RecencyBlendConfig {
    fn default() -> Self {
        Self {
            historical_weight: HISTORICAL_WEIGHT,
        }
    }
}

/// Scored-trend forecaster settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoredTrendConfig {
    pub trend_weight: f64,
    pub horizon: f64,
    pub short_window: usize,
    pub correlation_weight: f64,
    pub slope_weight: f64,
    pub confidence_scale: f64,
    pub thresholds: ScoreThresholds,
}

impl Default for ScoredTrendConfig {
    fn default() -> Self {
        Self {
            trend_weight: TREND_WEIGHT,
            horizon: TREND_HORIZON,
            short_window: SHORT_WINDOW,
            correlation_weight: SCORE_CORRELATION_WEIGHT,
            slope_weight: SCORE_SLOPE_WEIGHT,
            confidence_scale: SCORE_CONFIDENCE_SCALE,
            thresholds: ScoreThresholds::default(),
        }
    }
}

/// Interval construction settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalConfig {
    pub z_score: f64,
    pub single_point_std_ratio: f64,
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            z_score: Z_95,
            single_point_std_ratio: SINGLE_POINT_STD_RATIO,
        }
    }
}

/// Multipliers applied to historical unit revenue and unit cost
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentFactors {
    pub revenue: f64,
    pub cost: f64,
}

/// Unit-economics adjustment per trend direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentTable {
    pub growth: AdjustmentFactors,
    pub decline: AdjustmentFactors,
    pub stable: AdjustmentFactors,
}

impl Default for AdjustmentTable {
    fn default() -> Self {
        Self {
            growth: AdjustmentFactors {
                revenue: 1.08,
                cost: 1.05,
            },
            decline: AdjustmentFactors {
                revenue: 0.95,
                cost: 1.03,
            },
            stable: AdjustmentFactors {
                revenue: 1.04,
                cost: 1.04,
            },
        }
    }
}

/// Financial projection settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialConfig {
    pub adjustments: AdjustmentTable,
    pub fallback_quantity_growth: f64,
}

impl Default for FinancialConfig {
    fn default() -> Self {
        Self {
            adjustments: AdjustmentTable::default(),
            fallback_quantity_growth: FALLBACK_QUANTITY_GROWTH,
        }
    }
}

/// Annual market projection settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnualShareConfig {
    pub market_share_weight: f64,
    pub own_trend_weight: f64,
}

impl Default for AnnualShareConfig {
    fn default() -> Self {
        Self {
            market_share_weight: MARKET_SHARE_WEIGHT,
            own_trend_weight: OWN_TREND_WEIGHT,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Bucket width of recency-blend series
    pub blend_granularity: Granularity,
    /// Bucket width of scored-trend series
    pub scored_granularity: Granularity,
    pub trend: TrendThresholds,
    pub recency: RecencyBlendConfig,
    pub scored: ScoredTrendConfig,
    pub interval: IntervalConfig,
    pub financial: FinancialConfig,
    pub annual: AnnualShareConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            blend_granularity: Granularity::Month,
            scored_granularity: Granularity::Quarter,
            trend: TrendThresholds::default(),
            recency: RecencyBlendConfig::default(),
            scored: ScoredTrendConfig::default(),
            interval: IntervalConfig::default(),
            financial: FinancialConfig::default(),
            annual: AnnualShareConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON configuration and validate it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Check that weights and thresholds are usable
    pub fn validate(&self) -> Result<()> {
        validate_unit_interval(self.recency.historical_weight, "recency.historical_weight")?;
        validate_unit_interval(self.scored.trend_weight, "scored.trend_weight")?;
        validate_unit_interval(self.annual.market_share_weight, "annual.market_share_weight")?;
        validate_unit_interval(self.annual.own_trend_weight, "annual.own_trend_weight")?;

        if self.scored.short_window == 0 {
            return Err(ForecastError::InvalidParameter(
                "scored.short_window must be positive".to_string(),
            ));
        }

        validate_positive(self.scored.horizon, "scored.horizon")?;
        validate_positive(self.scored.confidence_scale, "scored.confidence_scale")?;
        validate_positive(self.interval.z_score, "interval.z_score")?;
        validate_non_negative(
            self.interval.single_point_std_ratio,
            "interval.single_point_std_ratio",
        )?;
        validate_non_negative(
            self.financial.fallback_quantity_growth,
            "financial.fallback_quantity_growth",
        )?;

        if self.trend.decline > self.trend.growth {
            return Err(ForecastError::InvalidParameter(format!(
                "trend.decline ({}) must not exceed trend.growth ({})",
                self.trend.decline, self.trend.growth
            )));
        }

        let s = &self.scored.thresholds;
        if !(s.strong_growth >= s.growth && s.growth >= s.stable && s.stable >= s.decline) {
            return Err(ForecastError::InvalidParameter(
                "scored.thresholds must be in descending order".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_unit_interval(value: f64, name: &str) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ForecastError::InvalidParameter(format!(
            "{} must be between 0 and 1, got {}",
            name, value
        )));
    }
    Ok(())
}

fn validate_positive(value: f64, name: &str) -> Result<()> {
    if value <= 0.0 || !value.is_finite() {
        return Err(ForecastError::InvalidParameter(format!(
            "{} must be positive, got {}",
            name, value
        )));
    }
    Ok(())
}

fn validate_non_negative(value: f64, name: &str) -> Result<()> {
    if value < 0.0 || !value.is_finite() {
        return Err(ForecastError::InvalidParameter(format!(
            "{} must not be negative, got {}",
            name, value
        )));
    }
    Ok(())
}
