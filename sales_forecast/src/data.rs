//! Sales ledger records and loading

use crate::error::{ForecastError, Result};
use crate::utils::date_parser;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Key used for the single market-wide entity
pub const MARKET_KEY: &str = "market";

/// A single sales transaction
///
/// Fields are private so the revenue and profit identities cannot be broken
/// after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    date: NaiveDate,
    region: String,
    product: String,
    salesperson: String,
    quantity: u32,
    unit_price: f64,
    revenue: f64,
    cost: f64,
    profit: f64,
}

impl SalesRecord {
    /// Create a record from its unit price; revenue and profit are derived
    pub fn new(
        date: NaiveDate,
        region: impl Into<String>,
        product: impl Into<String>,
        salesperson: impl Into<String>,
        quantity: u32,
        unit_price: f64,
        cost: f64,
    ) -> Self {
        let revenue = quantity as f64 * unit_price;
        Self {
            date,
            region: region.into(),
            product: product.into(),
            salesperson: salesperson.into(),
            quantity,
            unit_price,
            revenue,
            cost,
            profit: revenue - cost,
        }
    }

    /// Create a record from aggregate revenue; the unit price is derived
    /// (0 when nothing was sold)
    pub fn from_totals(
        date: NaiveDate,
        region: impl Into<String>,
        product: impl Into<String>,
        salesperson: impl Into<String>,
        quantity: u32,
        revenue: f64,
        cost: f64,
    ) -> Self {
        let unit_price = if quantity > 0 {
            revenue / quantity as f64
        } else {
            0.0
        };

        Self {
            date,
            region: region.into(),
            product: product.into(),
            salesperson: salesperson.into(),
            quantity,
            unit_price,
            revenue,
            cost,
            profit: revenue - cost,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn salesperson(&self) -> &str {
        &self.salesperson
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn revenue(&self) -> f64 {
        self.revenue
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn profit(&self) -> f64 {
        self.profit
    }
}

/// Dimension a ledger can be grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Product,
    Salesperson,
    Region,
    /// Every record falls under [`MARKET_KEY`]
    Market,
}

impl EntityKind {
    /// The grouping key of a record for this dimension
    pub fn key<'a>(&self, record: &'a SalesRecord) -> &'a str {
        match self {
            EntityKind::Product => record.product(),
            EntityKind::Salesperson => record.salesperson(),
            EntityKind::Region => record.region(),
            EntityKind::Market => MARKET_KEY,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Product => "product",
            EntityKind::Salesperson => "salesperson",
            EntityKind::Region => "region",
            EntityKind::Market => "market",
        };
        write!(f, "{}", name)
    }
}

/// Numeric field of a record that can be summed into a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Quantity,
    Revenue,
    Cost,
    Profit,
}

impl Metric {
    pub fn value(&self, record: &SalesRecord) -> f64 {
        match self {
            Metric::Quantity => record.quantity() as f64,
            Metric::Revenue => record.revenue(),
            Metric::Cost => record.cost(),
            Metric::Profit => record.profit(),
        }
    }
}

/// In-memory, read-only snapshot of a sales ledger
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<SalesRecord>,
}

impl RecordStore {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First and last transaction dates
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(SalesRecord::date).min()?;
        let last = self.records.iter().map(SalesRecord::date).max()?;
        Some((first, last))
    }

    /// Distinct entity names for a dimension, sorted
    pub fn distinct(&self, kind: EntityKind) -> BTreeSet<String> {
        self.records
            .iter()
            .map(|r| kind.key(r).to_string())
            .collect()
    }

    pub fn total_quantity(&self) -> u64 {
        self.records.iter().map(|r| r.quantity() as u64).sum()
    }

    pub fn total_revenue(&self) -> f64 {
        self.records.iter().map(SalesRecord::revenue).sum()
    }

    pub fn total_profit(&self) -> f64 {
        self.records.iter().map(SalesRecord::profit).sum()
    }
}

impl FromIterator<SalesRecord> for RecordStore {
    fn from_iter<I: IntoIterator<Item = SalesRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Row layout accepted by the loader
///
/// Aliases cover the headers of the legacy dataset export.
#[derive(Debug, Deserialize)]
struct SalesRow {
    #[serde(alias = "Data")]
    date: String,
    #[serde(alias = "Regiao")]
    region: String,
    #[serde(alias = "Produto")]
    product: String,
    #[serde(alias = "Vendedor")]
    salesperson: String,
    #[serde(alias = "Qtd_Vendida")]
    quantity: u32,
    #[serde(default)]
    unit_price: Option<f64>,
    #[serde(default, alias = "Receita")]
    revenue: Option<f64>,
    #[serde(default, alias = "Custo")]
    cost: Option<f64>,
    #[serde(default, alias = "Lucro")]
    profit: Option<f64>,
}

impl SalesRow {
    fn into_record(self, line: usize) -> Result<SalesRecord> {
        let date = date_parser::parse_date(&self.date).map_err(|e| {
            ForecastError::DataError(format!("Row {}: {}", line, e))
        })?;

        let revenue = match (self.revenue, self.unit_price) {
            (Some(revenue), _) => revenue,
            (None, Some(price)) => self.quantity as f64 * price,
            (None, None) => {
                return Err(ForecastError::DataError(format!(
                    "Row {}: either revenue or unit_price is required",
                    line
                )))
            }
        };

        let cost = match (self.cost, self.profit) {
            (Some(cost), _) => cost,
            (None, Some(profit)) => revenue - profit,
            (None, None) => {
                return Err(ForecastError::DataError(format!(
                    "Row {}: either cost or profit is required",
                    line
                )))
            }
        };

        Ok(SalesRecord::from_totals(
            date,
            self.region,
            self.product,
            self.salesperson,
            self.quantity,
            revenue,
            cost,
        ))
    }
}

/// Data loader for sales ledgers
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a ledger from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<RecordStore> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load a ledger from any CSV source with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<RecordStore> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for (index, row) in csv_reader.deserialize::<SalesRow>().enumerate() {
            // Header is line 1
            records.push(row?.into_record(index + 2)?);
        }

        log::info!("Loaded {} sales records", records.len());
        Ok(RecordStore::new(records))
    }
}
