//! Trend estimation and classification

use crate::aggregate::TimeSeries;
use crate::config::{ScoreThresholds, TrendThresholds};
use sales_math::{index_correlation, index_slope};
use serde::Serialize;
use std::fmt;

/// Three-level trend classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendDirection {
    Growth,
    Decline,
    Stable,
}

impl TrendDirection {
    /// Classify a correlation; both boundaries are exclusive
    pub fn classify(correlation: f64, thresholds: &TrendThresholds) -> Self {
        if correlation > thresholds.growth {
            TrendDirection::Growth
        } else if correlation < thresholds.decline {
            TrendDirection::Decline
        } else {
            TrendDirection::Stable
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrendDirection::Growth => "GROWTH",
            TrendDirection::Decline => "DECLINE",
            TrendDirection::Stable => "STABLE",
        };
        write!(f, "{}", label)
    }
}

/// Five-level classification driven by a composite trend score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendStrength {
    StrongGrowth,
    Growth,
    Stable,
    Decline,
    StrongDecline,
}

impl TrendStrength {
    pub fn from_score(score: f64, thresholds: &ScoreThresholds) -> Self {
        if score > thresholds.strong_growth {
            TrendStrength::StrongGrowth
        } else if score > thresholds.growth {
            TrendStrength::Growth
        } else if score > thresholds.stable {
            TrendStrength::Stable
        } else if score > thresholds.decline {
            TrendStrength::Decline
        } else {
            TrendStrength::StrongDecline
        }
    }

    /// Collapse to the three-level direction
    pub fn direction(&self) -> TrendDirection {
        match self {
            TrendStrength::StrongGrowth | TrendStrength::Growth => TrendDirection::Growth,
            TrendStrength::Stable => TrendDirection::Stable,
            TrendStrength::Decline | TrendStrength::StrongDecline => TrendDirection::Decline,
        }
    }
}

impl fmt::Display for TrendStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrendStrength::StrongGrowth => "STRONG GROWTH",
            TrendStrength::Growth => "GROWTH",
            TrendStrength::Stable => "STABLE",
            TrendStrength::Decline => "DECLINE",
            TrendStrength::StrongDecline => "STRONG DECLINE",
        };
        write!(f, "{}", label)
    }
}

/// Linear trend of a series against its period index
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendResult {
    /// Pearson correlation with the period index; 0 when undefined
    pub correlation: f64,
    /// OLS slope per period
    pub slope: f64,
    pub direction: TrendDirection,
    /// |correlation|, within [0, 1]
    pub confidence: f64,
    pub observations: usize,
}

impl TrendResult {
    /// Whether the series was long enough for a correlation
    pub fn is_defined(&self) -> bool {
        self.observations >= 2
    }
}

/// Correlation-based confidence, bounded to [0, 1]
pub fn correlation_confidence(correlation: f64) -> f64 {
    correlation.abs().min(1.0)
}

/// Estimate the trend of a series
///
/// Series shorter than two periods, or without variance, have correlation 0
/// and are classified as stable with confidence 0.
pub fn estimate_trend(series: &TimeSeries, thresholds: &TrendThresholds) -> TrendResult {
    estimate_trend_values(&series.values(), thresholds)
}

/// [`estimate_trend`] over raw values
pub fn estimate_trend_values(values: &[f64], thresholds: &TrendThresholds) -> TrendResult {
    let correlation = index_correlation(values);

    TrendResult {
        correlation,
        slope: index_slope(values),
        direction: TrendDirection::classify(correlation, thresholds),
        confidence: correlation_confidence(correlation),
        observations: values.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_point_is_stable() {
        let trend = estimate_trend_values(&[120.0], &TrendThresholds::default());
        assert_eq!(trend.correlation, 0.0);
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_eq!(trend.confidence, 0.0);
        assert!(!trend.is_defined());
    }

    #[test]
    fn test_strength_collapses_to_direction() {
        assert_eq!(TrendStrength::StrongGrowth.direction(), TrendDirection::Growth);
        assert_eq!(TrendStrength::StrongDecline.direction(), TrendDirection::Decline);
        assert_eq!(TrendStrength::Stable.direction(), TrendDirection::Stable);
    }

    #[test]
    fn test_labels() {
        assert_eq!(TrendStrength::StrongGrowth.to_string(), "STRONG GROWTH");
        assert_eq!(TrendDirection::Decline.to_string(), "DECLINE");
    }
}
