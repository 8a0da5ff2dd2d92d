//! Calendar-year projection from market trend and historical share

use crate::aggregate::{Granularity, TimeSeries};
use crate::config::{AnnualShareConfig, IntervalConfig};
use crate::confidence::{dispersion, interval, ConfidenceInterval};
use crate::error::{ForecastError, Result};
use sales_math::{ols_slope, LinearRegression};
use serde::Serialize;
use std::collections::BTreeMap;

/// Market-wide total projected to a target year
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketProjection {
    pub target_year: i32,
    pub last_year: i32,
    pub last_total: f64,
    /// Least-squares change of the yearly total per calendar year
    pub trend_per_year: f64,
    pub projected_total: f64,
    /// Fit quality of the yearly trend, when defined
    pub r_squared: Option<f64>,
}

/// Target-year projection of one entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualForecast {
    pub entity: String,
    pub point_estimate: f64,
    pub interval: ConfidenceInterval,
    /// Entity's share of all historical volume, as a fraction
    pub historical_share: f64,
    pub trend_per_year: f64,
    pub monthly_average: f64,
    pub quarterly_average: f64,
    /// Forecast as a percentage of the projected market
    pub projected_share_pct: Option<f64>,
}

// Widened before subtracting so extreme year labels cannot overflow
fn years_ahead(target_year: i32, last_year: i32) -> f64 {
    f64::from(target_year) - f64::from(last_year)
}

/// Blend of share-of-market knowledge and each entity's own yearly trend
///
/// `knowledge = historical_share × market_projection`,
/// `evidence = last_year_total + trend × (target - last_year)` and the
/// forecast is `w_share × knowledge + w_trend × evidence`, floored at 0.
#[derive(Debug, Clone)]
pub struct AnnualShareModel {
    config: AnnualShareConfig,
    intervals: IntervalConfig,
}

impl AnnualShareModel {
    pub fn new(config: AnnualShareConfig, intervals: IntervalConfig) -> Result<Self> {
        for (weight, name) in [
            (config.market_share_weight, "Market share weight"),
            (config.own_trend_weight, "Own trend weight"),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(ForecastError::InvalidParameter(format!(
                    "{} must be between 0 and 1",
                    name
                )));
            }
        }

        Ok(Self { config, intervals })
    }

    /// Project the market-wide yearly total to `target_year`
    pub fn project_market(&self, market: &TimeSeries, target_year: i32) -> Result<MarketProjection> {
        let yearly = market.rebucket(Granularity::Year)?;
        let (last_period, last_total) = *yearly.last().ok_or_else(|| {
            ForecastError::DataError("Cannot project an empty market series".to_string())
        })?;

        let years: Vec<f64> = yearly.periods().iter().map(|p| p.year as f64).collect();
        let totals = yearly.values();

        let (trend_per_year, r_squared) = match LinearRegression::fit(&years, &totals) {
            Ok(regression) => (regression.slope(), regression.r_squared()),
            Err(_) => (0.0, None),
        };

        let projected_total = last_total + trend_per_year * years_ahead(target_year, last_period.year);

        log::info!(
            "Market trend {:+.0}/year, projected {} total {:.0}",
            trend_per_year,
            target_year,
            projected_total
        );

        Ok(MarketProjection {
            target_year,
            last_year: last_period.year,
            last_total,
            trend_per_year,
            projected_total,
            r_squared,
        })
    }

    /// Project one entity given its share of `market_volume`
    pub fn forecast_entity(
        &self,
        series: &TimeSeries,
        market_volume: f64,
        market: &MarketProjection,
    ) -> Result<AnnualForecast> {
        let yearly = series.rebucket(Granularity::Year)?;
        let (last_period, last_total) = *yearly.last().ok_or_else(|| {
            ForecastError::ValidationError(format!("Empty series for '{}'", series.entity()))
        })?;

        let years: Vec<f64> = yearly.periods().iter().map(|p| p.year as f64).collect();
        let values = yearly.values();

        let historical_share = if market_volume > 0.0 {
            yearly.total() / market_volume
        } else {
            0.0
        };
        let trend_per_year = ols_slope(&years, &values);

        let knowledge = historical_share * market.projected_total;
        let evidence =
            last_total + trend_per_year * years_ahead(market.target_year, last_period.year);
        let point_estimate = (self.config.market_share_weight * knowledge
            + self.config.own_trend_weight * evidence)
            .max(0.0);

        let std_dev = dispersion(&values, &self.intervals);
        let projected_share_pct = if market.projected_total > 0.0 {
            Some(point_estimate / market.projected_total * 100.0)
        } else {
            None
        };

        Ok(AnnualForecast {
            entity: series.entity().to_string(),
            point_estimate,
            interval: interval(point_estimate, std_dev, &self.intervals),
            historical_share,
            trend_per_year,
            monthly_average: point_estimate / 12.0,
            quarterly_average: point_estimate / 4.0,
            projected_share_pct,
        })
    }

    /// Project every entity of a grouping
    pub fn forecast_all(
        &self,
        series: &BTreeMap<String, TimeSeries>,
        market: &MarketProjection,
    ) -> Result<BTreeMap<String, AnnualForecast>> {
        let market_volume: f64 = series.values().map(TimeSeries::total).sum();

        series
            .iter()
            .map(|(entity, s)| Ok((entity.clone(), self.forecast_entity(s, market_volume, market)?)))
            .collect()
    }
}

impl Default for AnnualShareModel {
    fn default() -> Self {
        Self {
            config: AnnualShareConfig::default(),
            intervals: IntervalConfig::default(),
        }
    }
}
