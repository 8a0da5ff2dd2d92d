use approx::assert_relative_eq;
use pretty_assertions::assert_eq;
use sales_forecast::utils::{generate_sample_records, SAMPLE_PRODUCTS, SAMPLE_SALESPEOPLE};
use sales_forecast::{DataLoader, EngineConfig, EntityKind, RecordStore, SalesAnalysis};
use std::io::Write;
use tempfile::NamedTempFile;

fn sample_store() -> RecordStore {
    generate_sample_records(2022, 3, 42).into_iter().collect()
}

#[test]
fn test_full_analysis_invariants() {
    let store = sample_store();
    let analysis = SalesAnalysis::new(&store, EngineConfig::default()).unwrap();
    let report = analysis.run("2025").unwrap();

    assert_eq!(report.target_year, 2025);
    assert_eq!(report.record_count, store.len());
    assert_eq!(report.products.len(), SAMPLE_PRODUCTS.len());
    assert!(report.salespeople.len() <= SAMPLE_SALESPEOPLE.len());
    assert!(report.market.is_some());

    let all_forecasts = report
        .products
        .values()
        .chain(report.salespeople.values())
        .chain(report.regions.values())
        .chain(report.market.iter());

    for forecast in all_forecasts {
        assert!(forecast.point_estimate >= 0.0, "{}", forecast.entity);
        assert!(forecast.interval.lower >= 0.0);
        assert!(forecast.interval.lower <= forecast.point_estimate);
        assert!(forecast.point_estimate <= forecast.interval.upper);
        assert!((0.0..=1.0).contains(&forecast.confidence));
    }

    // Salespeople use the scored policy, everyone else the recency blend
    assert!(report.salespeople.values().all(|f| f.scored.is_some()));
    assert!(report.products.values().all(|f| f.scored.is_none()));

    for shares in [&report.product_shares, &report.salesperson_shares] {
        let total: f64 = shares.shares().unwrap().values().sum();
        assert!((total - 100.0).abs() < 1e-6);
    }

    for distribution in report.product_by_region.values() {
        let total: f64 = distribution.shares().unwrap().values().sum();
        assert!((total - 100.0).abs() < 1e-6);
    }
}

#[test]
fn test_financials_follow_product_forecasts() {
    let store = sample_store();
    let report = SalesAnalysis::new(&store, EngineConfig::default())
        .unwrap()
        .run("2025")
        .unwrap();

    assert_eq!(
        report.financials.keys().collect::<Vec<_>>(),
        report.products.keys().collect::<Vec<_>>()
    );

    for (product, projection) in &report.financials {
        let forecast = &report.products[product];
        assert!(!projection.fallback);
        assert_eq!(projection.direction, forecast.direction);
        assert_relative_eq!(projection.projected_quantity, forecast.point_estimate);
        assert_relative_eq!(
            projection.projected_revenue,
            projection.projected_quantity * projection.unit_revenue,
            epsilon = 1e-6
        );
        assert_relative_eq!(
            projection.projected_profit,
            projection.projected_revenue - projection.projected_cost,
            epsilon = 1e-6
        );
    }

    let summary = &report.financial_summary;
    let revenue: f64 = report.financials.values().map(|p| p.projected_revenue).sum();
    assert_relative_eq!(summary.projected_revenue, revenue, epsilon = 1e-6);
    assert_relative_eq!(summary.historical_revenue, store.total_revenue(), max_relative = 1e-9);
    assert!(summary.most_profitable.is_some());
}

#[test]
fn test_report_matches_direct_forecasts() {
    let store = sample_store();
    let analysis = SalesAnalysis::new(&store, EngineConfig::default()).unwrap();
    let report = analysis.run("2025").unwrap();

    assert_eq!(report.products, analysis.demand_forecasts(EntityKind::Product).unwrap());
    assert_eq!(
        report.salespeople,
        analysis.demand_forecasts(EntityKind::Salesperson).unwrap()
    );

    // Same ledger, same numbers
    assert_eq!(report, analysis.run("2025").unwrap());
}

#[test]
fn test_annual_projection() {
    let store = sample_store();
    let report = SalesAnalysis::new(&store, EngineConfig::default())
        .unwrap()
        .run("2025")
        .unwrap();

    let market = &report.market_projection;
    assert_eq!(market.target_year, 2025);
    assert_eq!(market.last_year, 2024);
    assert!(market.r_squared.is_some());

    assert_eq!(
        report.annual_salespeople.keys().collect::<Vec<_>>(),
        report.salespeople.keys().collect::<Vec<_>>()
    );
    for forecast in report.annual_salespeople.values() {
        assert!(forecast.point_estimate >= 0.0);
        assert!(forecast.interval.lower >= 0.0);
        assert_relative_eq!(forecast.monthly_average * 12.0, forecast.point_estimate, epsilon = 1e-6);
    }

    let share_total: f64 = report
        .annual_salespeople
        .values()
        .map(|f| f.historical_share)
        .sum();
    assert_relative_eq!(share_total, 1.0, epsilon = 1e-9);

    for salesperson in report.salespeople.keys() {
        assert!(report.specialty(salesperson).is_some());
    }
}

#[test]
fn test_executive_summary() {
    let store = sample_store();
    let report = SalesAnalysis::new(&store, EngineConfig::default())
        .unwrap()
        .run("2025")
        .unwrap();

    let best_product = report.most_promising_product.as_deref().unwrap();
    let best_forecast = report.products[best_product].point_estimate;
    assert!(report.products.values().all(|f| f.point_estimate <= best_forecast));

    let best_salesperson = report.top_scored_salesperson.as_deref().unwrap();
    let best_score = report.salespeople[best_salesperson].scored.unwrap().score;
    assert!(report
        .salespeople
        .values()
        .all(|f| f.scored.unwrap().score <= best_score));

    let annual_total: f64 = report
        .annual_salespeople
        .values()
        .map(|f| f.point_estimate)
        .sum();
    assert_relative_eq!(report.annual_volume, annual_total, epsilon = 1e-9);

    for forecast in report.salespeople.values() {
        let corr = forecast.scored.unwrap().revenue_correlation.unwrap();
        assert!((-1.0..=1.0).contains(&corr));
    }

    let text = report.to_string();
    assert!(text.contains("--- Executive summary ---"));
    assert!(text.contains(&format!("Most promising product: {}", best_product)));
    assert!(text.contains(&format!("Strongest salesperson trend: {}", best_salesperson)));
}

#[test]
fn test_text_and_json_output() {
    let store = sample_store();
    let report = SalesAnalysis::new(&store, EngineConfig::default())
        .unwrap()
        .run("2025")
        .unwrap();

    let text = report.to_string();
    assert!(text.contains("=== Sales forecast 2025 ==="));
    assert!(text.contains("--- Financial outlook ---"));
    for product in SAMPLE_PRODUCTS {
        assert!(text.contains(product));
    }

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["target_year"], 2025);
    assert!(json["products"]["Notebook"]["point_estimate"].is_number());
    assert!(json["product_shares"]["defined"].is_object());
    assert!(json["annual_volume"].is_number());
}

#[test]
fn test_analysis_from_csv() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,region,product,salesperson,quantity,unit_price,cost").unwrap();
    for (i, quantity) in [10, 12, 14, 16, 18, 20].iter().enumerate() {
        writeln!(
            file,
            "2024-{:02}-28,Sul,Monitor,Ana,{},100.0,{}",
            i + 1,
            quantity,
            quantity * 60
        )
        .unwrap();
    }

    let store = DataLoader::from_csv(file.path()).unwrap();
    let report = SalesAnalysis::new(&store, EngineConfig::default())
        .unwrap()
        .run("2025")
        .unwrap();

    let monitor = &report.products["Monitor"];
    assert_eq!(monitor.label(), "GROWTH");
    assert!(monitor.point_estimate > monitor.historical_mean);

    let financial = &report.financials["Monitor"];
    assert_relative_eq!(financial.unit_revenue, 100.0 * 1.08, epsilon = 1e-9);
    assert_relative_eq!(financial.unit_cost, 60.0 * 1.05, epsilon = 1e-9);

    // One year of history: the market projection is the last total
    assert_eq!(report.market_projection.trend_per_year, 0.0);
    assert_eq!(report.market_projection.projected_total, 90.0);
    assert_relative_eq!(
        report.annual_salespeople["Ana"].point_estimate,
        90.0,
        epsilon = 1e-9
    );
}
