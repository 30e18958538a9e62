//! Command-line entry point.
//!
//! Resolves settings from `--config` and flags, runs the scrape, then writes
//! the table to the requested JSON and/or CSV files. With no output path the
//! JSON is printed to stdout.

use chrono::{Datelike, Local};
use clap::Parser;
use mpc_minutes::config::{ScraperConfig, load_config};
use mpc_minutes::outputs::{csv, json};
use mpc_minutes::scrape_with;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::Cli;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("mpc_minutes starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let file_config = match &args.config {
        Some(path) => load_config(path)?,
        None => ScraperConfig::default(),
    };
    let (options, fetch_settings) = file_config
        .merge(args.overrides())
        .resolve(Local::now().year())?;
    info!(
        start_year = options.start_year,
        end_year = options.end_year,
        months = options.months.len(),
        base_url = %options.base_url,
        timeout_secs = fetch_settings.timeout.as_secs_f64(),
        "Resolved configuration"
    );

    let table = scrape_with(&options, &fetch_settings).await;

    if let Some(path) = &args.json_output {
        if let Err(e) = json::write_table(&table, path).await {
            error!(path = %path.display(), error = %e, "Failed writing JSON");
            return Err(e);
        }
    }
    if let Some(path) = &args.csv_output {
        if let Err(e) = csv::write_table(&table, path).await {
            error!(path = %path.display(), error = %e, "Failed writing CSV");
            return Err(e);
        }
    }
    if args.json_output.is_none() && args.csv_output.is_none() {
        println!("{}", serde_json::to_string_pretty(&table)?);
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        rows = table.len(),
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
