//! Grouping of ledger records into per-entity time series

use crate::data::{EntityKind, Metric, SalesRecord};
use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Width of the time buckets a series is summed into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Month,
    Quarter,
    Year,
}

/// A calendar bucket at some granularity
///
/// `sub` is the month (1-12), the quarter (1-4) or 0 for a whole year, so the
/// derived ordering is chronological within one granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Period {
    pub year: i32,
    pub sub: u32,
    pub granularity: Granularity,
}

impl Period {
    /// The bucket containing `date`
    pub fn of(date: NaiveDate, granularity: Granularity) -> Self {
        let sub = match granularity {
            Granularity::Month => date.month(),
            Granularity::Quarter => (date.month() - 1) / 3 + 1,
            Granularity::Year => 0,
        };
        Self {
            year: date.year(),
            sub,
            granularity,
        }
    }

    /// The same period expressed at a coarser (or equal) granularity
    pub fn coarsen(&self, target: Granularity) -> Result<Self> {
        if target < self.granularity {
            return Err(ForecastError::ValidationError(format!(
                "Cannot split {:?} buckets into {:?} buckets",
                self.granularity, target
            )));
        }

        let sub = match (self.granularity, target) {
            (_, Granularity::Year) => 0,
            (Granularity::Month, Granularity::Quarter) => (self.sub - 1) / 3 + 1,
            _ => self.sub,
        };

        Ok(Self {
            year: self.year,
            sub,
            granularity: target,
        })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.granularity {
            Granularity::Month => write!(f, "{}-{:02}", self.year, self.sub),
            Granularity::Quarter => write!(f, "{}-Q{}", self.year, self.sub),
            Granularity::Year => write!(f, "{}", self.year),
        }
    }
}

/// Chronologically ordered metric values of one entity
///
/// Missing periods are absent, never zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    entity: String,
    granularity: Granularity,
    points: Vec<(Period, f64)>,
}

impl TimeSeries {
    /// Build a series, sorting the points chronologically
    pub fn new(entity: impl Into<String>, granularity: Granularity, mut points: Vec<(Period, f64)>) -> Self {
        points.sort_by(|a, b| a.0.cmp(&b.0));
        Self {
            entity: entity.into(),
            granularity,
            points,
        }
    }

    /// Series over consecutive yearly periods starting at `first_year`
    pub fn from_values(entity: impl Into<String>, first_year: i32, values: &[f64]) -> Self {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                (
                    Period {
                        year: first_year + i as i32,
                        sub: 0,
                        granularity: Granularity::Year,
                    },
                    v,
                )
            })
            .collect();
        Self::new(entity, Granularity::Year, points)
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn points(&self) -> &[(Period, f64)] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, v)| *v).collect()
    }

    pub fn periods(&self) -> Vec<Period> {
        self.points.iter().map(|(p, _)| *p).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&(Period, f64)> {
        self.points.last()
    }

    pub fn total(&self) -> f64 {
        self.points.iter().map(|(_, v)| v).sum()
    }

    /// Sum the series into coarser buckets
    pub fn rebucket(&self, granularity: Granularity) -> Result<Self> {
        if granularity == self.granularity {
            return Ok(self.clone());
        }

        let mut buckets: BTreeMap<Period, f64> = BTreeMap::new();
        for (period, value) in &self.points {
            *buckets.entry(period.coarsen(granularity)?).or_insert(0.0) += value;
        }

        Ok(Self {
            entity: self.entity.clone(),
            granularity,
            points: buckets.into_iter().collect(),
        })
    }
}

/// Group records by entity and period, summing `metric`
///
/// Returns one series per distinct entity with periods in ascending order.
pub fn aggregate(
    records: &[SalesRecord],
    kind: EntityKind,
    granularity: Granularity,
    metric: Metric,
) -> BTreeMap<String, TimeSeries> {
    let mut grouped: BTreeMap<&str, BTreeMap<Period, f64>> = BTreeMap::new();

    for record in records {
        let period = Period::of(record.date(), granularity);
        *grouped
            .entry(kind.key(record))
            .or_default()
            .entry(period)
            .or_insert(0.0) += metric.value(record);
    }

    grouped
        .into_iter()
        .map(|(entity, buckets)| {
            let series = TimeSeries {
                entity: entity.to_string(),
                granularity,
                points: buckets.into_iter().collect(),
            };
            (entity.to_string(), series)
        })
        .collect()
}

/// Aggregate quantity and money totals of one entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HistoricalTotals {
    pub quantity: u64,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
}

impl HistoricalTotals {
    fn add(&mut self, record: &SalesRecord) {
        self.quantity += record.quantity() as u64;
        self.revenue += record.revenue();
        self.cost += record.cost();
        self.profit += record.profit();
    }

    fn per_unit(&self, amount: f64) -> f64 {
        if self.quantity == 0 {
            0.0
        } else {
            amount / self.quantity as f64
        }
    }

    /// Revenue per unit sold (0 when nothing was sold)
    pub fn unit_revenue(&self) -> f64 {
        self.per_unit(self.revenue)
    }

    /// Cost per unit sold (0 when nothing was sold)
    pub fn unit_cost(&self) -> f64 {
        self.per_unit(self.cost)
    }

    /// Profit per unit sold (0 when nothing was sold)
    pub fn unit_profit(&self) -> f64 {
        self.per_unit(self.profit)
    }

    /// Profit as a percentage of revenue; `None` without revenue
    pub fn margin_pct(&self) -> Option<f64> {
        if self.revenue > 0.0 {
            Some(self.profit / self.revenue * 100.0)
        } else {
            None
        }
    }
}

/// Lifetime totals per entity
pub fn totals_by(records: &[SalesRecord], kind: EntityKind) -> BTreeMap<String, HistoricalTotals> {
    let mut totals: BTreeMap<String, HistoricalTotals> = BTreeMap::new();
    for record in records {
        totals
            .entry(kind.key(record).to_string())
            .or_default()
            .add(record);
    }
    totals
}

/// Sum `metric` for every `of` entity within each `given` entity
pub fn cross_totals(
    records: &[SalesRecord],
    given: EntityKind,
    of: EntityKind,
    metric: Metric,
) -> BTreeMap<String, BTreeMap<String, f64>> {
    let mut totals: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    for record in records {
        *totals
            .entry(given.key(record).to_string())
            .or_default()
            .entry(of.key(record).to_string())
            .or_insert(0.0) += metric.value(record);
    }
    totals
}
