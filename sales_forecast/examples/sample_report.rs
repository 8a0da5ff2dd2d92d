use sales_forecast::utils::generate_sample_records;
use sales_forecast::{EngineConfig, EntityKind, ForecastModel, RecordStore, SalesAnalysis};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Three years of synthetic monthly sales
    let store: RecordStore = generate_sample_records(2022, 3, 42).into_iter().collect();
    println!("Generated {} sales records", store.len());

    let analysis = SalesAnalysis::new(&store, EngineConfig::default())?;

    // Forecast a single grouping
    let products = analysis.demand_forecasts(EntityKind::Product)?;
    println!(
        "Next-month forecast using {}:",
        analysis.model_for(EntityKind::Product).name()
    );
    for (product, forecast) in &products {
        println!(
            "{}: {:.0} [{:.0} - {:.0}] {}",
            product,
            forecast.point_estimate,
            forecast.interval.lower,
            forecast.interval.upper,
            forecast.label()
        );
    }

    // Full report for the following year
    let report = analysis.run("2025")?;
    println!();
    print!("{}", report);

    Ok(())
}
