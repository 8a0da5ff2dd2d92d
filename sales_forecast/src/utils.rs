//! Utility functions for the sales_forecast crate

use crate::data::SalesRecord;
use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Products of the sample ledger
pub const SAMPLE_PRODUCTS: [&str; 5] = ["Notebook", "Smartphone", "Impressora", "Monitor", "Headset"];
/// Regions of the sample ledger
pub const SAMPLE_REGIONS: [&str; 5] = ["Nordeste", "Sudeste", "Sul", "Centro-Oeste", "Norte"];
/// Salespeople of the sample ledger
pub const SAMPLE_SALESPEOPLE: [&str; 6] = ["Ana", "Bruno", "Carlos", "Daniela", "Eduardo", "Fernanda"];

/// Date parsing helpers for ledger files
pub mod date_parser {
    use crate::error::{ForecastError, Result};
    use chrono::{NaiveDate, NaiveDateTime};

    const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];
    const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

    /// Parse a calendar date, dropping any time-of-day component
    pub fn parse_date(input: &str) -> Result<NaiveDate> {
        let input = input.trim();

        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(input, format) {
                return Ok(date);
            }
        }

        for format in DATETIME_FORMATS {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(input, format) {
                return Ok(datetime.date());
            }
        }

        Err(ForecastError::DataError(format!(
            "Unrecognized date: '{}'",
            input
        )))
    }
}

/// Last calendar day of a month
pub fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Generate a synthetic ledger for testing purposes
///
/// One month-end record per (month, region, product) starting in January of
/// `start_year` for `years` years. Each record goes to a random salesperson
/// with quantity in 5..100, unit price in 500..5000 and a cost ratio in
/// 0.5..0.8 of revenue. The same seed always yields the same ledger.
pub fn generate_sample_records(start_year: i32, years: u32, seed: u64) -> Vec<SalesRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let months = years as usize * 12;
    let mut records = Vec::with_capacity(months * SAMPLE_REGIONS.len() * SAMPLE_PRODUCTS.len());

    let dates = (0..years as i32)
        .flat_map(|offset| (1..=12).map(move |month| (start_year + offset, month)))
        .filter_map(|(year, month)| month_end(year, month));

    for date in dates {
        for region in SAMPLE_REGIONS {
            for product in SAMPLE_PRODUCTS {
                let salesperson = SAMPLE_SALESPEOPLE[rng.gen_range(0..SAMPLE_SALESPEOPLE.len())];
                let quantity: u32 = rng.gen_range(5..100);
                let unit_price: f64 = rng.gen_range(500.0..5000.0);
                let revenue = quantity as f64 * unit_price;
                let cost = revenue * rng.gen_range(0.5..0.8);

                records.push(SalesRecord::new(
                    date, region, product, salesperson, quantity, unit_price, cost,
                ));
            }
        }
    }

    log::debug!(
        "Generated {} sample records from {} ({} years)",
        records.len(),
        records.first().map(|r| r.date().year()).unwrap_or(start_year),
        years
    );

    records
}
