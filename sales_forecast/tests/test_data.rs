use approx::assert_relative_eq;
use chrono::NaiveDate;
use sales_forecast::data::{DataLoader, EntityKind, RecordStore};
use sales_forecast::error::ForecastError;
use sales_forecast::utils::{generate_sample_records, SAMPLE_PRODUCTS, SAMPLE_REGIONS};
use std::io::Write;
use tempfile::NamedTempFile;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_load_csv_with_unit_price() {
    let data = "\
date,region,product,salesperson,quantity,unit_price,cost
2024-01-31,Sul,Monitor,Ana,10,25.0,150.0
2024-02-29,Norte,Notebook,Bruno,2,3000.0,4000.0
";
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(data.as_bytes()).unwrap();

    let store = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(store.len(), 2);
    let first = &store.records()[0];
    assert_eq!(first.date(), day(2024, 1, 31));
    assert_eq!(first.product(), "Monitor");
    assert_eq!(first.revenue(), 250.0);
    assert_eq!(first.profit(), 100.0);
    assert_eq!(store.date_range(), Some((day(2024, 1, 31), day(2024, 2, 29))));
}

#[test]
fn test_load_legacy_headers() {
    let data = "\
Data,Regiao,Produto,Vendedor,Qtd_Vendida,Receita,Custo,Lucro
2023-01-31,Sudeste,Notebook,Ana,5,5000.0,3000.0,2000.0
2023-01-31,Sul,Headset,Carlos,8,800.0,500.0,300.0
";

    let store = DataLoader::from_reader(data.as_bytes()).unwrap();

    assert_eq!(store.len(), 2);
    let record = &store.records()[0];
    assert_eq!(record.region(), "Sudeste");
    assert_eq!(record.salesperson(), "Ana");
    assert_eq!(record.quantity(), 5);
    assert_eq!(record.unit_price(), 1000.0);
    assert_eq!(record.cost(), 3000.0);
    assert_eq!(store.total_quantity(), 13);
    assert_relative_eq!(store.total_profit(), 2300.0);
}

#[test]
fn test_cost_derived_from_profit() {
    let data = "\
date,region,product,salesperson,quantity,revenue,profit
2024-03-31 00:00:00,Sul,Monitor,Ana,4,100.0,40.0
";

    let store = DataLoader::from_reader(data.as_bytes()).unwrap();

    assert_eq!(store.records()[0].cost(), 60.0);
    assert_eq!(store.records()[0].date(), day(2024, 3, 31));
}

#[test]
fn test_empty_optional_field_falls_back_to_unit_price() {
    let data = "\
date,region,product,salesperson,quantity,unit_price,revenue,cost
31/01/2024,Sul,Monitor,Ana,2,10.0,,5.0
";

    let store = DataLoader::from_reader(data.as_bytes()).unwrap();

    assert_eq!(store.records()[0].revenue(), 20.0);
    assert_eq!(store.records()[0].date(), day(2024, 1, 31));
}

#[test]
fn test_row_without_revenue_is_rejected() {
    let data = "\
date,region,product,salesperson,quantity,cost
2024-01-31,Sul,Monitor,Ana,2,5.0
";

    match DataLoader::from_reader(data.as_bytes()) {
        Err(ForecastError::DataError(message)) => assert!(message.contains("Row 2")),
        other => panic!("Expected DataError, got {:?}", other),
    }
}

#[test]
fn test_bad_date_is_rejected() {
    let data = "\
date,region,product,salesperson,quantity,unit_price,cost
2024-13-45,Sul,Monitor,Ana,2,10.0,5.0
";

    assert!(matches!(
        DataLoader::from_reader(data.as_bytes()),
        Err(ForecastError::DataError(_))
    ));
}

#[test]
fn test_bad_quantity_is_a_csv_error() {
    let data = "\
date,region,product,salesperson,quantity,unit_price,cost
2024-01-31,Sul,Monitor,Ana,lots,10.0,5.0
";

    assert!(matches!(
        DataLoader::from_reader(data.as_bytes()),
        Err(ForecastError::CsvError(_))
    ));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        DataLoader::from_csv(dir.path().join("missing.csv")),
        Err(ForecastError::IoError(_))
    ));
}

#[test]
fn test_sample_ledger_shape() {
    let records = generate_sample_records(2022, 3, 42);
    assert_eq!(records.len(), 3 * 12 * SAMPLE_REGIONS.len() * SAMPLE_PRODUCTS.len());

    let store: RecordStore = records.into_iter().collect();
    assert_eq!(store.distinct(EntityKind::Product).len(), SAMPLE_PRODUCTS.len());
    assert_eq!(store.distinct(EntityKind::Region).len(), SAMPLE_REGIONS.len());
    assert_eq!(store.date_range(), Some((day(2022, 1, 31), day(2024, 12, 31))));

    for record in store.records() {
        assert!((5..100).contains(&record.quantity()));
        assert!(record.cost() < record.revenue());
    }
}

#[test]
fn test_sample_ledger_depends_on_seed() {
    assert_ne!(generate_sample_records(2023, 1, 7), generate_sample_records(2023, 1, 8));
}
