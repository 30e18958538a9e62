//! # MPC Minutes
//!
//! Scrapes the Bank of England's published Monetary Policy Committee
//! minutes over a range of years and months into a table of
//! `title, date, text, year, month, url` rows.
//!
//! ## Architecture
//!
//! The pipeline runs one page at a time:
//! 1. **Address**: Build the page URL for a (year, month) pair ([`address`])
//! 2. **Fetch**: One GET per page; missing or failed pages are absent ([`fetch`])
//! 3. **Extract**: Title, date and main body text from the HTML ([`extract`])
//! 4. **Assemble**: Walk the grid, collect rows, normalize text ([`scrape`])
//!
//! ## Usage
//!
//! ```no_run
//! use std::time::Duration;
//!
//! # async fn run() {
//! let table = mpc_minutes::scrape(2022, 2023, None, Duration::from_secs(1)).await;
//! for row in &table {
//!     println!("{} {} {}", row.year, row.month, row.title);
//! }
//! # }
//! ```

pub mod address;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod models;
pub mod outputs;
pub mod scrape;
pub mod utils;

pub use address::{MONTHS, build_address};
pub use extract::extract;
pub use fetch::{FetchSettings, HttpFetcher, PageSource, fetch};
pub use models::{MinutesRecord, MinutesTable, PageAddress, PageContent, RawDocument};
pub use scrape::{DelayPolicy, ScrapeOptions, Scraper, scrape, scrape_with};
