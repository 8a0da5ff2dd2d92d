//! Revenue, cost and profit projections from demand forecasts
//!
//! Historical unit economics of an entity are scaled by a factor pair picked
//! from its trend direction, then multiplied by the forecast quantity.
//! Entities without a forecast fall back to a flat quantity growth and a
//! stable classification.

use crate::aggregate::HistoricalTotals;
use crate::config::{AdjustmentFactors, FinancialConfig};
use crate::models::ForecastResult;
use crate::trend::TrendDirection;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Projected margin below which an entity is flagged in the summary
pub const LOW_MARGIN_PCT: f64 = 30.0;

/// Percentage change of `projected` against `historical`
///
/// `None` when there is no historical value to compare against.
pub fn variation_pct(projected: f64, historical: f64) -> Option<f64> {
    if historical == 0.0 {
        None
    } else {
        Some((projected - historical) / historical * 100.0)
    }
}

/// Profit as a percentage of revenue, 0 without revenue
pub fn margin_pct(profit: f64, revenue: f64) -> f64 {
    if revenue > 0.0 {
        profit / revenue * 100.0
    } else {
        0.0
    }
}

/// Financial outlook of one entity for the target period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialProjection {
    pub entity: String,
    pub direction: TrendDirection,
    /// Set when no demand forecast was available
    pub fallback: bool,
    pub projected_quantity: f64,
    pub unit_revenue: f64,
    pub unit_cost: f64,
    pub unit_profit: f64,
    pub projected_revenue: f64,
    pub projected_cost: f64,
    pub projected_profit: f64,
    pub margin_pct: f64,
    pub revenue_variation_pct: Option<f64>,
    pub cost_variation_pct: Option<f64>,
    pub profit_variation_pct: Option<f64>,
    pub historical: HistoricalTotals,
}

impl fmt::Display for FinancialProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.entity, self.direction)?;
        writeln!(f, "  Quantity:    {:.0}", self.projected_quantity)?;
        writeln!(
            f,
            "  Revenue:     {:.2} ({})",
            self.projected_revenue,
            format_variation(self.revenue_variation_pct)
        )?;
        writeln!(
            f,
            "  Cost:        {:.2} ({})",
            self.projected_cost,
            format_variation(self.cost_variation_pct)
        )?;
        writeln!(
            f,
            "  Profit:      {:.2} ({})",
            self.projected_profit,
            format_variation(self.profit_variation_pct)
        )?;
        writeln!(f, "  Margin:      {:.1}%", self.margin_pct)?;
        Ok(())
    }
}

pub(crate) fn format_variation(variation: Option<f64>) -> String {
    match variation {
        Some(v) => format!("{:+.1}%", v),
        None => "n/a".to_string(),
    }
}

/// Applies trend-dependent unit-economics factors to demand forecasts
#[derive(Debug, Clone, Default)]
pub struct FinancialAdjuster {
    config: FinancialConfig,
}

impl FinancialAdjuster {
    pub fn new(config: FinancialConfig) -> Self {
        Self { config }
    }

    /// Revenue and cost multipliers for a direction
    pub fn factors(&self, direction: TrendDirection) -> AdjustmentFactors {
        match direction {
            TrendDirection::Growth => self.config.adjustments.growth,
            TrendDirection::Decline => self.config.adjustments.decline,
            TrendDirection::Stable => self.config.adjustments.stable,
        }
    }

    /// Project one entity
    ///
    /// Without a forecast the quantity is the historical quantity times the
    /// fallback growth and the direction is stable.
    pub fn project(
        &self,
        entity: &str,
        historical: &HistoricalTotals,
        forecast: Option<&ForecastResult>,
    ) -> FinancialProjection {
        let (projected_quantity, direction, fallback) = match forecast {
            Some(forecast) => (forecast.point_estimate, forecast.direction, false),
            None => {
                log::warn!(
                    "No forecast for '{}', assuming {:+.0}% quantity growth",
                    entity,
                    (self.config.fallback_quantity_growth - 1.0) * 100.0
                );
                (
                    historical.quantity as f64 * self.config.fallback_quantity_growth,
                    TrendDirection::Stable,
                    true,
                )
            }
        };

        let factors = self.factors(direction);
        let unit_revenue = historical.unit_revenue() * factors.revenue;
        let unit_cost = historical.unit_cost() * factors.cost;

        let projected_revenue = projected_quantity * unit_revenue;
        let projected_cost = projected_quantity * unit_cost;
        let projected_profit = projected_revenue - projected_cost;

        FinancialProjection {
            entity: entity.to_string(),
            direction,
            fallback,
            projected_quantity,
            unit_revenue,
            unit_cost,
            unit_profit: unit_revenue - unit_cost,
            projected_revenue,
            projected_cost,
            projected_profit,
            margin_pct: margin_pct(projected_profit, projected_revenue),
            revenue_variation_pct: variation_pct(projected_revenue, historical.revenue),
            cost_variation_pct: variation_pct(projected_cost, historical.cost),
            profit_variation_pct: variation_pct(projected_profit, historical.profit),
            historical: *historical,
        }
    }

    /// Project every entity with historical totals
    pub fn project_all(
        &self,
        forecasts: &BTreeMap<String, ForecastResult>,
        totals: &BTreeMap<String, HistoricalTotals>,
    ) -> BTreeMap<String, FinancialProjection> {
        totals
            .iter()
            .map(|(entity, historical)| {
                (
                    entity.clone(),
                    self.project(entity, historical, forecasts.get(entity)),
                )
            })
            .collect()
    }
}

/// Consolidated view over a set of projections
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialSummary {
    pub projected_revenue: f64,
    pub projected_cost: f64,
    pub projected_profit: f64,
    pub projected_margin_pct: f64,
    pub historical_revenue: f64,
    pub historical_cost: f64,
    pub historical_profit: f64,
    pub historical_margin_pct: f64,
    pub revenue_variation_pct: Option<f64>,
    pub cost_variation_pct: Option<f64>,
    pub profit_variation_pct: Option<f64>,
    pub most_profitable: Option<String>,
    pub best_margin: Option<String>,
    /// Most profitable entity among those classified as growing
    pub top_growth: Option<String>,
    /// Entities whose projected margin is below [`LOW_MARGIN_PCT`]
    pub low_margin: Vec<String>,
}

impl FinancialSummary {
    pub fn from_projections(projections: &BTreeMap<String, FinancialProjection>) -> Self {
        let projected_revenue = total(projections, |p| p.projected_revenue);
        let projected_cost = total(projections, |p| p.projected_cost);
        let projected_profit = total(projections, |p| p.projected_profit);
        let historical_revenue = total(projections, |p| p.historical.revenue);
        let historical_cost = total(projections, |p| p.historical.cost);
        let historical_profit = total(projections, |p| p.historical.profit);

        let most_profitable = max_entity(projections.values(), |p| p.projected_profit);
        let best_margin = max_entity(projections.values(), |p| p.margin_pct);
        let top_growth = max_entity(
            projections
                .values()
                .filter(|p| p.direction == TrendDirection::Growth),
            |p| p.projected_profit,
        );

        let low_margin = projections
            .values()
            .filter(|p| p.projected_revenue > 0.0 && p.margin_pct < LOW_MARGIN_PCT)
            .map(|p| p.entity.clone())
            .collect();

        Self {
            projected_revenue,
            projected_cost,
            projected_profit,
            projected_margin_pct: margin_pct(projected_profit, projected_revenue),
            historical_revenue,
            historical_cost,
            historical_profit,
            historical_margin_pct: margin_pct(historical_profit, historical_revenue),
            revenue_variation_pct: variation_pct(projected_revenue, historical_revenue),
            cost_variation_pct: variation_pct(projected_cost, historical_cost),
            profit_variation_pct: variation_pct(projected_profit, historical_profit),
            most_profitable,
            best_margin,
            top_growth,
            low_margin,
        }
    }
}

fn total<F>(projections: &BTreeMap<String, FinancialProjection>, field: F) -> f64
where
    F: Fn(&FinancialProjection) -> f64,
{
    projections.values().map(field).sum()
}

// Ties resolve to the alphabetically first entity
fn max_entity<'a, I, F>(projections: I, key: F) -> Option<String>
where
    I: Iterator<Item = &'a FinancialProjection>,
    F: Fn(&FinancialProjection) -> f64,
{
    let mut best: Option<&FinancialProjection> = None;
    for projection in projections {
        match best {
            Some(current) if key(projection) <= key(current) => {}
            _ => best = Some(projection),
        }
    }
    best.map(|p| p.entity.clone())
}

impl fmt::Display for FinancialSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Revenue: {:.2} ({})",
            self.projected_revenue,
            format_variation(self.revenue_variation_pct)
        )?;
        writeln!(
            f,
            "Cost:    {:.2} ({})",
            self.projected_cost,
            format_variation(self.cost_variation_pct)
        )?;
        writeln!(
            f,
            "Profit:  {:.2} ({})",
            self.projected_profit,
            format_variation(self.profit_variation_pct)
        )?;
        writeln!(
            f,
            "Margin:  {:.1}% (historical {:.1}%)",
            self.projected_margin_pct, self.historical_margin_pct
        )?;
        if let Some(entity) = &self.most_profitable {
            writeln!(f, "Most profitable: {}", entity)?;
        }
        if let Some(entity) = &self.best_margin {
            writeln!(f, "Best margin:     {}", entity)?;
        }
        if let Some(entity) = &self.top_growth {
            writeln!(f, "Top growth:      {}", entity)?;
        }
        if !self.low_margin.is_empty() {
            writeln!(
                f,
                "Below {:.0}% margin: {}",
                LOW_MARGIN_PCT,
                self.low_margin.join(", ")
            )?;
        }
        Ok(())
    }
}
