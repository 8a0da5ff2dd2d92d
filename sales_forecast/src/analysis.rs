//! Complete analysis of a ledger for one target period
//!
//! [`SalesAnalysis::run`] computes every forecast, projection and
//! distribution once and hands back a single [`AnalysisReport`]. Text
//! summaries, JSON output and charts all read the same report, so they can
//! never disagree.

use crate::aggregate::{aggregate, totals_by, Granularity};
use crate::config::EngineConfig;
use crate::data::{EntityKind, Metric, RecordStore, MARKET_KEY};
use crate::error::{ForecastError, Result};
use crate::financial::{FinancialAdjuster, FinancialProjection, FinancialSummary};
use crate::models::annual_share::{AnnualForecast, AnnualShareModel, MarketProjection};
use crate::models::recency_blend::RecencyBlend;
use crate::models::scored_trend::ScoredTrend;
use crate::models::{ForecastModel, ForecastResult};
use crate::shares::{conditional_shares, normalize_shares, ShareDistribution};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Forecasting engine bound to one read-only ledger
#[derive(Debug)]
pub struct SalesAnalysis<'a> {
    store: &'a RecordStore,
    config: EngineConfig,
    blend: RecencyBlend,
    scored: ScoredTrend,
    annual: AnnualShareModel,
    adjuster: FinancialAdjuster,
}

impl<'a> SalesAnalysis<'a> {
    /// Validate `config` and build the forecasting policies
    pub fn new(store: &'a RecordStore, config: EngineConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            store,
            blend: RecencyBlend::new(config.recency, config.trend, config.interval)?,
            scored: ScoredTrend::new(
                config.scored,
                config.scored_granularity,
                config.trend,
                config.interval,
            )?,
            annual: AnnualShareModel::new(config.annual, config.interval)?,
            adjuster: FinancialAdjuster::new(config.financial),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Policy applied to an entity kind
    ///
    /// Salespeople get the scored trend, everything else the recency blend.
    pub fn model_for(&self, kind: EntityKind) -> &dyn ForecastModel {
        match kind {
            EntityKind::Salesperson => &self.scored,
            _ => &self.blend,
        }
    }

    fn granularity_for(&self, kind: EntityKind) -> Granularity {
        match kind {
            EntityKind::Salesperson => self.config.scored_granularity,
            _ => self.config.blend_granularity,
        }
    }

    /// Next-period quantity forecast of every entity of `kind`
    pub fn demand_forecasts(&self, kind: EntityKind) -> Result<BTreeMap<String, ForecastResult>> {
        let series = aggregate(
            self.store.records(),
            kind,
            self.granularity_for(kind),
            Metric::Quantity,
        );

        let model = self.model_for(kind);
        log::debug!("Forecasting {} {} series with {}", series.len(), kind, model.name());
        let mut forecasts = model.forecast_all(&series)?;

        if kind == EntityKind::Salesperson {
            self.attach_revenue_trends(&mut forecasts)?;
        }
        Ok(forecasts)
    }

    fn attach_revenue_trends(&self, forecasts: &mut BTreeMap<String, ForecastResult>) -> Result<()> {
        let revenue = aggregate(
            self.store.records(),
            EntityKind::Salesperson,
            self.config.scored_granularity,
            Metric::Revenue,
        );

        for (entity, forecast) in forecasts.iter_mut() {
            if let (Some(details), Some(series)) = (forecast.scored.as_mut(), revenue.get(entity)) {
                details.revenue_correlation = Some(self.scored.revenue_correlation(series)?);
            }
        }
        Ok(())
    }

    /// Run the whole analysis for a calendar-year label such as `"2025"`
    pub fn run(&self, target_period: &str) -> Result<AnalysisReport> {
        let target_year: i32 = target_period.trim().parse().map_err(|_| {
            ForecastError::InvalidParameter(format!(
                "Target period must be a calendar year, got '{}'",
                target_period
            ))
        })?;

        if self.store.is_empty() {
            return Err(ForecastError::DataError(
                "Cannot analyse an empty ledger".to_string(),
            ));
        }

        let records = self.store.records();
        log::info!(
            "Analysing {} records for {}",
            records.len(),
            target_year
        );

        let products = self.demand_forecasts(EntityKind::Product)?;
        let salespeople = self.demand_forecasts(EntityKind::Salesperson)?;
        let regions = self.demand_forecasts(EntityKind::Region)?;
        let market = self
            .demand_forecasts(EntityKind::Market)?
            .remove(MARKET_KEY);
        log::info!(
            "Forecast {} products, {} salespeople, {} regions",
            products.len(),
            salespeople.len(),
            regions.len()
        );

        let financials = self
            .adjuster
            .project_all(&products, &totals_by(records, EntityKind::Product));
        let financial_summary = FinancialSummary::from_projections(&financials);

        let product_shares = normalize_shares(&point_estimates(&products));
        let salesperson_shares = normalize_shares(&point_estimates(&salespeople));

        let market_series = aggregate(records, EntityKind::Market, Granularity::Year, Metric::Quantity);
        let market_series = market_series.get(MARKET_KEY).ok_or_else(|| {
            ForecastError::DataError("Ledger has no market volume".to_string())
        })?;
        let market_projection = self.annual.project_market(market_series, target_year)?;
        let annual_salespeople = self.annual.forecast_all(
            &aggregate(records, EntityKind::Salesperson, Granularity::Year, Metric::Quantity),
            &market_projection,
        )?;

        let product_by_region =
            conditional_shares(records, EntityKind::Region, EntityKind::Product, Metric::Quantity);
        let product_by_salesperson = conditional_shares(
            records,
            EntityKind::Salesperson,
            EntityKind::Product,
            Metric::Quantity,
        );

        let most_promising_product =
            top_entity(products.iter().map(|(entity, f)| (entity, f.point_estimate)));
        let top_scored_salesperson = top_entity(
            salespeople
                .iter()
                .filter_map(|(entity, f)| f.scored.map(|details| (entity, details.score))),
        );
        let annual_volume: f64 = annual_salespeople.values().map(|f| f.point_estimate).sum();

        log::info!("Analysis for {} complete", target_year);

        Ok(AnalysisReport {
            target_year,
            history: self.store.date_range(),
            record_count: records.len(),
            products,
            salespeople,
            regions,
            market,
            financials,
            financial_summary,
            product_shares,
            salesperson_shares,
            market_projection,
            annual_salespeople,
            product_by_region,
            product_by_salesperson,
            most_promising_product,
            top_scored_salesperson,
            annual_volume,
        })
    }
}

// Ties resolve to the alphabetically first entity
fn top_entity<'e, I>(candidates: I) -> Option<String>
where
    I: Iterator<Item = (&'e String, f64)>,
{
    let mut best: Option<(&String, f64)> = None;
    for (entity, value) in candidates {
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((entity, value)),
        }
    }
    best.map(|(entity, _)| entity.clone())
}

fn point_estimates(forecasts: &BTreeMap<String, ForecastResult>) -> BTreeMap<String, f64> {
    forecasts
        .iter()
        .map(|(entity, forecast)| (entity.clone(), forecast.point_estimate))
        .collect()
}

/// Every output of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub target_year: i32,
    /// First and last transaction dates
    pub history: Option<(NaiveDate, NaiveDate)>,
    pub record_count: usize,
    pub products: BTreeMap<String, ForecastResult>,
    pub salespeople: BTreeMap<String, ForecastResult>,
    pub regions: BTreeMap<String, ForecastResult>,
    pub market: Option<ForecastResult>,
    /// Per-product financial outlook
    pub financials: BTreeMap<String, FinancialProjection>,
    pub financial_summary: FinancialSummary,
    pub product_shares: ShareDistribution,
    pub salesperson_shares: ShareDistribution,
    pub market_projection: MarketProjection,
    pub annual_salespeople: BTreeMap<String, AnnualForecast>,
    /// P(product | region) in percent
    pub product_by_region: BTreeMap<String, ShareDistribution>,
    /// P(product | salesperson) in percent
    pub product_by_salesperson: BTreeMap<String, ShareDistribution>,
    /// Product with the largest demand forecast
    pub most_promising_product: Option<String>,
    /// Salesperson with the highest trend score
    pub top_scored_salesperson: Option<String>,
    /// Sum of the target-year salesperson projections
    pub annual_volume: f64,
}

impl AnalysisReport {
    /// Product a salesperson sells most of
    pub fn specialty(&self, salesperson: &str) -> Option<&str> {
        self.product_by_salesperson
            .get(salesperson)?
            .top()
            .map(|(product, _)| product)
    }
}

fn write_shares(f: &mut fmt::Formatter<'_>, title: &str, shares: &ShareDistribution) -> fmt::Result {
    writeln!(f, "{}", title)?;
    match shares.shares() {
        Some(shares) => {
            for (entity, share) in shares {
                writeln!(f, "  {:<16} {:>6.1}%", entity, share)?;
            }
        }
        None => writeln!(f, "  undefined (no forecast volume)")?,
    }
    Ok(())
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Sales forecast {} ===", self.target_year)?;
        if let Some((first, last)) = self.history {
            writeln!(f, "History: {} to {} ({} records)", first, last, self.record_count)?;
        }
        writeln!(f)?;

        writeln!(f, "--- Products ---")?;
        for forecast in self.products.values() {
            write!(f, "{}", forecast)?;
        }
        writeln!(f)?;

        writeln!(f, "--- Salespeople ---")?;
        for forecast in self.salespeople.values() {
            write!(f, "{}", forecast)?;
            if let Some(product) = self.specialty(&forecast.entity) {
                writeln!(f, "  Specialty:   {}", product)?;
            }
        }
        writeln!(f)?;

        write_shares(f, "--- Product shares ---", &self.product_shares)?;
        write_shares(f, "--- Salesperson shares ---", &self.salesperson_shares)?;
        writeln!(f)?;

        writeln!(f, "--- Market {} ---", self.target_year)?;
        writeln!(
            f,
            "Projected volume {:.0} (last {} {:.0}, trend {:+.0}/year)",
            self.market_projection.projected_total,
            self.market_projection.last_year,
            self.market_projection.last_total,
            self.market_projection.trend_per_year
        )?;
        for forecast in self.annual_salespeople.values() {
            writeln!(
                f,
                "  {:<16} {:>8.0} [{:.0} - {:.0}] {:.0}/month",
                forecast.entity,
                forecast.point_estimate,
                forecast.interval.lower,
                forecast.interval.upper,
                forecast.monthly_average
            )?;
        }
        writeln!(f)?;

        writeln!(f, "--- Financial outlook ---")?;
        for projection in self.financials.values() {
            write!(f, "{}", projection)?;
        }
        writeln!(f)?;
        write!(f, "{}", self.financial_summary)?;
        writeln!(f)?;

        writeln!(f, "--- Executive summary ---")?;
        if let Some(product) = &self.most_promising_product {
            writeln!(f, "Most promising product: {}", product)?;
        }
        if let Some(salesperson) = &self.top_scored_salesperson {
            writeln!(f, "Strongest salesperson trend: {}", salesperson)?;
        }
        writeln!(
            f,
            "Projected {} volume: {:.0} units",
            self.target_year, self.annual_volume
        )
    }
}
