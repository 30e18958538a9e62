//! Command-line interface definitions for the minutes scraper.
//!
//! Every flag is optional except the start year, which may instead come from
//! the config file. Flags override values read from `--config`.

use clap::Parser;
use mpc_minutes::config::ScraperConfig;
use mpc_minutes::scrape::DelayPolicy;
use std::path::PathBuf;

/// Command-line arguments for the minutes scraper.
///
/// # Examples
///
/// ```sh
/// # All of 2023, written as JSON
/// mpc_minutes --start-year 2023 --end-year 2023 -j ./minutes.json
///
/// # Quarterly meetings only, both formats, slower pace
/// mpc_minutes --start-year 2015 --months february,may,august,november \
///     --delay-secs 2 -j out/minutes.json --csv-output out/minutes.csv
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// First year to scrape (inclusive)
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Last year to scrape (inclusive); defaults to the current year
    #[arg(long)]
    pub end_year: Option<i32>,

    /// Comma-separated month names to visit, in order; defaults to all twelve
    #[arg(long, value_delimiter = ',')]
    pub months: Option<Vec<String>>,

    /// Pause after each fetched page, in seconds
    #[arg(long)]
    pub delay_secs: Option<f64>,

    /// When to pause: only after fetched pages, or after every request
    #[arg(long, value_enum)]
    pub delay_policy: Option<DelayPolicy>,

    /// Per-request timeout, in seconds
    #[arg(long)]
    pub timeout_secs: Option<f64>,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Site to scrape instead of the Bank of England
    #[arg(long)]
    pub base_url: Option<String>,

    /// Path of the JSON output file
    #[arg(short, long)]
    pub json_output: Option<PathBuf>,

    /// Path of the CSV output file
    #[arg(long)]
    pub csv_output: Option<PathBuf>,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// The settings layer given on the command line.
    pub fn overrides(&self) -> ScraperConfig {
        ScraperConfig {
            start_year: self.start_year,
            end_year: self.end_year,
            months: self.months.clone(),
            delay_secs: self.delay_secs,
            delay_policy: self.delay_policy,
            timeout_secs: self.timeout_secs,
            user_agent: self.user_agent.clone(),
            headers: None,
            base_url: self.base_url.clone(),
        }
    }
}
