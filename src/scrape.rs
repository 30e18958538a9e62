//! The scrape loop: walks the (year × month) grid, fetches and extracts each
//! page, and assembles the result table.
//!
//! # Pipeline
//!
//! For every cell, in order (years ascending, months in the order given):
//!
//! 1. Build the page address
//! 2. Fetch it; an absent page is skipped without emitting a row
//! 3. Extract title, date and text; a page with no content region is skipped
//! 4. Attach year, month and url, push the row
//! 5. Sleep for the politeness delay (see [`DelayPolicy`])
//!
//! Once the grid is exhausted every row's text has its whitespace collapsed.
//! Nothing in here returns an error: the outcome is always a table, possibly
//! empty.

use crate::address::{DEFAULT_BASE_URL, MONTHS, build_address_with_base, month_slug};
use crate::extract::extract;
use crate::fetch::{FetchSettings, HttpFetcher, PageSource};
use crate::models::{MinutesRecord, MinutesTable, RawDocument};
use crate::utils::{normalize_whitespace, truncate_for_log};
use clap::ValueEnum;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Pause between requests unless overridden.
pub const DEFAULT_POLITENESS_DELAY: Duration = Duration::from_secs(1);

/// When the politeness delay is charged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DelayPolicy {
    /// Only after a page produced a row.
    #[default]
    AfterContent,
    /// After every request, whatever its outcome.
    AfterEveryRequest,
}

/// Parameters of a single scrape run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeOptions {
    /// First year, inclusive.
    pub start_year: i32,
    /// Last year, inclusive.
    pub end_year: i32,
    /// Month names to visit for each year, in visiting order.
    pub months: Vec<String>,
    pub politeness_delay: Duration,
    pub delay_policy: DelayPolicy,
    pub base_url: String,
}

impl ScrapeOptions {
    /// Options for `start_year..=end_year` with all twelve months and the
    /// default delay.
    pub fn new(start_year: i32, end_year: i32) -> Self {
        Self {
            start_year,
            end_year,
            months: MONTHS.iter().map(|m| m.to_string()).collect(),
            politeness_delay: DEFAULT_POLITENESS_DELAY,
            delay_policy: DelayPolicy::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_months<I, M>(mut self, months: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        self.months = months.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.politeness_delay = delay;
        self
    }

    pub fn with_delay_policy(mut self, policy: DelayPolicy) -> Self {
        self.delay_policy = policy;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Number of (year, month) cells the run will visit.
    pub fn cell_count(&self) -> usize {
        if self.start_year > self.end_year {
            return 0;
        }
        let years = i64::from(self.end_year) - i64::from(self.start_year) + 1;
        usize::try_from(years)
            .unwrap_or(usize::MAX)
            .saturating_mul(self.months.len())
    }
}

/// Drives a [`PageSource`] over the (year × month) grid.
#[derive(Debug)]
pub struct Scraper<S> {
    source: S,
}

impl<S: PageSource> Scraper<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Visit every cell described by `options` and return the collected rows.
    #[instrument(level = "info", skip_all, fields(start_year = options.start_year, end_year = options.end_year))]
    pub async fn run(&self, options: &ScrapeOptions) -> MinutesTable {
        let t0 = Instant::now();
        let mut table = MinutesTable::new();
        let mut absent = 0usize;
        let mut unparsed = 0usize;

        info!(
            cells = options.cell_count(),
            months = ?options.months,
            delay_ms = options.politeness_delay.as_millis() as u64,
            policy = ?options.delay_policy,
            "Starting minutes scrape"
        );

        for year in options.start_year..=options.end_year {
            for month in &options.months {
                let month = month_slug(month);
                let url = build_address_with_base(&options.base_url, year, &month);

                let html = match self.source.fetch(&url).await {
                    RawDocument::Content(html) => html,
                    RawDocument::Absent => {
                        debug!(year, %month, %url, "No minutes page; skipping");
                        absent += 1;
                        self.pause_after(options, false).await;
                        continue;
                    }
                };

                match extract(&html) {
                    Ok(content) => {
                        debug!(
                            year,
                            %month,
                            title = %truncate_for_log(&content.title, 120),
                            date = %content.date,
                            "Extracted minutes"
                        );
                        table.push(MinutesRecord::new(content, year, month, url));
                        self.pause_after(options, true).await;
                    }
                    Err(e) => {
                        warn!(year, %month, %url, error = %e, "Unparseable page; skipping");
                        unparsed += 1;
                        self.pause_after(options, false).await;
                    }
                }
            }
        }

        for row in table.rows_mut() {
            row.text = normalize_whitespace(&row.text);
        }

        let elapsed = t0.elapsed();
        info!(
            rows = table.len(),
            absent,
            unparsed,
            elapsed_ms = elapsed.as_millis() as u64,
            "Minutes scrape complete"
        );
        table
    }

    async fn pause_after(&self, options: &ScrapeOptions, produced_row: bool) {
        let charge = match options.delay_policy {
            DelayPolicy::AfterContent => produced_row,
            DelayPolicy::AfterEveryRequest => true,
        };
        if charge && !options.politeness_delay.is_zero() {
            sleep(options.politeness_delay).await;
        }
    }
}

/// Scrape the live site with default headers and timeout.
///
/// `months` defaults to all twelve months in calendar order.
pub async fn scrape(
    start_year: i32,
    end_year: i32,
    months: Option<&[&str]>,
    politeness_delay: Duration,
) -> MinutesTable {
    let mut options = ScrapeOptions::new(start_year, end_year).with_delay(politeness_delay);
    if let Some(months) = months {
        options = options.with_months(months.iter().copied());
    }
    scrape_with(&options, &FetchSettings::default()).await
}

/// Scrape with explicit options and HTTP settings.
///
/// If the HTTP client cannot be built from `settings` no page can be
/// fetched, so the result is an empty table.
pub async fn scrape_with(options: &ScrapeOptions, settings: &FetchSettings) -> MinutesTable {
    match HttpFetcher::new(settings) {
        Ok(fetcher) => Scraper::new(fetcher).run(options).await,
        Err(e) => {
            warn!(error = %e, "Could not build HTTP client; returning empty table");
            MinutesTable::new()
        }
    }
}
