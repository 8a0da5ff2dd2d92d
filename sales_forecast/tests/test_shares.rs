use approx::assert_relative_eq;
use chrono::NaiveDate;
use sales_forecast::data::{EntityKind, Metric, SalesRecord};
use sales_forecast::shares::{conditional_shares, normalize_shares, ShareDistribution};
use std::collections::BTreeMap;

fn map(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn sale(region: &str, product: &str, salesperson: &str, quantity: u32) -> SalesRecord {
    let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    SalesRecord::new(date, region, product, salesperson, quantity, 10.0, quantity as f64 * 6.0)
}

#[test]
fn test_equal_forecasts_split_evenly() {
    let shares = normalize_shares(&map(&[("Ana", 50.0), ("Bruno", 50.0)]));

    assert!(shares.is_defined());
    assert_relative_eq!(shares.get("Ana").unwrap(), 50.0, epsilon = 1e-9);
    assert_relative_eq!(shares.get("Bruno").unwrap(), 50.0, epsilon = 1e-9);
}

#[test]
fn test_shares_sum_to_one_hundred() {
    let shares = normalize_shares(&map(&[
        ("Notebook", 123.4),
        ("Smartphone", 0.0),
        ("Impressora", 98.7),
        ("Monitor", 1e-3),
        ("Headset", 4567.0),
    ]));

    let total: f64 = shares.shares().unwrap().values().sum();
    assert!((total - 100.0).abs() < 1e-6);
    assert_eq!(shares.top().map(|(entity, _)| entity), Some("Headset"));
}

#[test]
fn test_all_zero_forecasts_are_undefined() {
    let shares = normalize_shares(&map(&[("Ana", 0.0), ("Bruno", 0.0)]));

    assert_eq!(shares, ShareDistribution::Undefined);
    assert_eq!(shares.get("Ana"), None);
    assert!(shares.shares().is_none());
}

#[test]
fn test_empty_map_is_undefined() {
    assert_eq!(normalize_shares(&BTreeMap::new()), ShareDistribution::Undefined);
}

#[test]
fn test_product_given_region() {
    let records = vec![
        sale("Sul", "Monitor", "Ana", 30),
        sale("Sul", "Notebook", "Bruno", 10),
        sale("Norte", "Notebook", "Ana", 5),
    ];

    let by_region = conditional_shares(&records, EntityKind::Region, EntityKind::Product, Metric::Quantity);

    assert_relative_eq!(by_region["Sul"].get("Monitor").unwrap(), 75.0, epsilon = 1e-9);
    assert_relative_eq!(by_region["Sul"].get("Notebook").unwrap(), 25.0, epsilon = 1e-9);
    assert_relative_eq!(by_region["Norte"].get("Notebook").unwrap(), 100.0, epsilon = 1e-9);
    assert_eq!(by_region["Norte"].get("Monitor"), None);
}

#[test]
fn test_specialist_product() {
    let records = vec![
        sale("Sul", "Monitor", "Ana", 30),
        sale("Norte", "Notebook", "Ana", 5),
        sale("Sul", "Headset", "Bruno", 0),
    ];

    let by_salesperson =
        conditional_shares(&records, EntityKind::Salesperson, EntityKind::Product, Metric::Quantity);

    assert_eq!(by_salesperson["Ana"].top().map(|(p, _)| p), Some("Monitor"));
    // A salesperson with no volume has no distribution
    assert_eq!(by_salesperson["Bruno"], ShareDistribution::Undefined);
}
