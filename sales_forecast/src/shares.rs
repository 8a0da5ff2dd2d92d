//! Percentage shares of a whole

use crate::aggregate::cross_totals;
use crate::data::{EntityKind, Metric, SalesRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// Percentage share of each entity, or `Undefined` when the whole is 0
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareDistribution {
    /// Shares in percent, summing to 100
    Defined(BTreeMap<String, f64>),
    Undefined,
}

impl ShareDistribution {
    pub fn is_defined(&self) -> bool {
        matches!(self, ShareDistribution::Defined(_))
    }

    /// Share of one entity in percent
    pub fn get(&self, entity: &str) -> Option<f64> {
        match self {
            ShareDistribution::Defined(shares) => shares.get(entity).copied(),
            ShareDistribution::Undefined => None,
        }
    }

    pub fn shares(&self) -> Option<&BTreeMap<String, f64>> {
        match self {
            ShareDistribution::Defined(shares) => Some(shares),
            ShareDistribution::Undefined => None,
        }
    }

    /// Entity with the largest share; ties go to the alphabetically first
    pub fn top(&self) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for (entity, &share) in self.shares()? {
            match best {
                Some((_, current)) if share <= current => {}
                _ => best = Some((entity.as_str(), share)),
            }
        }
        best
    }
}

/// Turn non-negative values into percentage shares
///
/// Negative values count as 0. An empty or all-zero input is `Undefined`.
pub fn normalize_shares(values: &BTreeMap<String, f64>) -> ShareDistribution {
    let total: f64 = values.values().map(|v| v.max(0.0)).sum();
    if total <= 0.0 {
        return ShareDistribution::Undefined;
    }

    ShareDistribution::Defined(
        values
            .iter()
            .map(|(entity, v)| (entity.clone(), v.max(0.0) / total * 100.0))
            .collect(),
    )
}

/// Distribution of `of` entities within each `given` entity
///
/// For `given = Region` and `of = Product` each entry is the percentage
/// P(product | region) of the summed `metric`.
pub fn conditional_shares(
    records: &[SalesRecord],
    given: EntityKind,
    of: EntityKind,
    metric: Metric,
) -> BTreeMap<String, ShareDistribution> {
    cross_totals(records, given, of, metric)
        .into_iter()
        .map(|(entity, totals)| {
            let distribution = normalize_shares(&totals);
            if !distribution.is_defined() {
                log::warn!("No {} volume for {} '{}'", of, given, entity);
            }
            (entity, distribution)
        })
        .collect()
}
