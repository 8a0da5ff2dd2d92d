//! Forecast Report - sales ledger analysis from the command line
//!
//! Loads a sales ledger, runs the full analysis for a target year and
//! prints either a text summary or the JSON report.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin forecast_report -- <LEDGER.csv> [TARGET_YEAR] [--config engine.json] [--json]
//! ```
//!
//! The target year defaults to the year after the last transaction.
//!
//! ## Environment Variables
//!
//! - `RUST_LOG` - Log level (default: info)

use chrono::Datelike;
use sales_forecast::{DataLoader, EngineConfig, SalesAnalysis};
use std::path::PathBuf;

const USAGE: &str =
    "Usage: forecast_report <LEDGER.csv> [TARGET_YEAR] [--config engine.json] [--json]";

/// Command-line configuration for a report run
#[derive(Debug)]
struct ReportArgs {
    ledger: PathBuf,
    target: Option<String>,
    config: Option<PathBuf>,
    json: bool,
}

impl ReportArgs {
    fn from_args() -> Result<Self, Box<dyn std::error::Error>> {
        let mut positional = Vec::new();
        let mut config = None;
        let mut json = false;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--json" => json = true,
                "--config" => {
                    let path = args
                        .next()
                        .ok_or_else(|| format!("Missing value for --config. {}", USAGE))?;
                    config = Some(PathBuf::from(path));
                }
                "-h" | "--help" => return Err(USAGE.into()),
                flag if flag.starts_with("--") => {
                    return Err(format!("Unknown option {}. {}", flag, USAGE).into())
                }
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let ledger = positional
            .next()
            .map(PathBuf::from)
            .ok_or_else(|| format!("Missing ledger file. {}", USAGE))?;
        let target = positional.next();

        if let Some(extra) = positional.next() {
            return Err(format!("Unexpected argument {}. {}", extra, USAGE).into());
        }

        Ok(Self {
            ledger,
            target,
            config,
            json,
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = ReportArgs::from_args()?;

    let config = match &args.config {
        Some(path) => {
            log::info!("Loading engine config from {}", path.display());
            EngineConfig::from_json_file(path)?
        }
        None => EngineConfig::default(),
    };

    let store = DataLoader::from_csv(&args.ledger)?;
    let target = match args.target {
        Some(target) => target,
        None => {
            let (_, last) = store
                .date_range()
                .ok_or("Ledger contains no records")?;
            (last.year() + 1).to_string()
        }
    };

    let analysis = SalesAnalysis::new(&store, config)?;
    let report = analysis.run(&target)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }

    Ok(())
}
