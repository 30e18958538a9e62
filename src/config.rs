//! Run configuration.
//!
//! Settings come from two optional layers: a YAML file and command-line
//! flags. Both are represented as a [`ScraperConfig`] with every field
//! optional; flags are [merged](ScraperConfig::merge) over the file, and the
//! result is [resolved](ScraperConfig::resolve) into the explicit
//! [`ScrapeOptions`] and [`FetchSettings`] the library works with.
//!
//! ```yaml
//! start_year: 2015
//! end_year: 2024
//! months: [february, may, august, november]
//! delay_secs: 2.0
//! delay_policy: after_every_request
//! timeout_secs: 30
//! user_agent: "my-research-bot/0.1 (me@example.com)"
//! headers:
//!   Accept-Language: en-GB
//! ```

use crate::fetch::FetchSettings;
use crate::scrape::{DelayPolicy, ScrapeOptions};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument, warn};
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("no start year given (use --start-year or `start_year` in the config file)")]
    MissingStartYear,
    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("invalid {field}: {value} is not a usable number of seconds")]
    InvalidDuration { field: &'static str, value: f64 },
}

/// One layer of settings. Every field is optional; unset fields fall
/// through to the next layer and finally to the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScraperConfig {
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub months: Option<Vec<String>>,
    pub delay_secs: Option<f64>,
    pub delay_policy: Option<DelayPolicy>,
    pub timeout_secs: Option<f64>,
    pub user_agent: Option<String>,
    /// Extra request headers, added on top of the defaults.
    pub headers: Option<BTreeMap<String, String>>,
    pub base_url: Option<String>,
}

/// Load a [`ScraperConfig`] from a YAML file.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub fn load_config(path: impl AsRef<Path>) -> Result<ScraperConfig, ConfigError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: display.clone(),
        source,
    })?;
    let config = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: display,
        source,
    })?;
    info!("Loaded configuration file");
    Ok(config)
}

impl ScraperConfig {
    /// Overlay `other` on top of `self`: any field set in `other` wins.
    /// Header maps are combined key by key.
    pub fn merge(self, other: ScraperConfig) -> ScraperConfig {
        let headers = match (self.headers, other.headers) {
            (Some(mut base), Some(over)) => {
                base.extend(over);
                Some(base)
            }
            (base, over) => over.or(base),
        };
        ScraperConfig {
            start_year: other.start_year.or(self.start_year),
            end_year: other.end_year.or(self.end_year),
            months: other.months.or(self.months),
            delay_secs: other.delay_secs.or(self.delay_secs),
            delay_policy: other.delay_policy.or(self.delay_policy),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            user_agent: other.user_agent.or(self.user_agent),
            headers,
            base_url: other.base_url.or(self.base_url),
        }
    }

    /// Turn this layer into concrete run settings, applying defaults.
    ///
    /// `default_end_year` is used when no end year was configured.
    pub fn resolve(self, default_end_year: i32) -> Result<(ScrapeOptions, FetchSettings), ConfigError> {
        let start_year = self.start_year.ok_or(ConfigError::MissingStartYear)?;
        let end_year = self.end_year.unwrap_or(default_end_year);
        if start_year > end_year {
            warn!(start_year, end_year, "Start year is after end year; nothing will be fetched");
        }

        let mut options = ScrapeOptions::new(start_year, end_year);
        if let Some(months) = self.months {
            options = options.with_months(months);
        }
        if let Some(secs) = self.delay_secs {
            options = options.with_delay(seconds("delay_secs", secs)?);
        }
        if let Some(policy) = self.delay_policy {
            options = options.with_delay_policy(policy);
        }
        if let Some(base_url) = self.base_url {
            validate_base_url(&base_url)?;
            options = options.with_base_url(base_url);
        }

        let mut fetch = FetchSettings::default();
        if let Some(secs) = self.timeout_secs {
            fetch.timeout = seconds("timeout_secs", secs)?;
        }
        if let Some(extra) = self.headers {
            fetch.headers.extend(extra);
        }
        if let Some(user_agent) = self.user_agent {
            fetch.headers.retain(|name, _| !name.eq_ignore_ascii_case("user-agent"));
            fetch.headers.insert("User-Agent".to_string(), user_agent);
        }

        Ok((options, fetch))
    }
}

fn seconds(field: &'static str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|_| ConfigError::InvalidDuration { field, value })
}

fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: format!("unsupported scheme {other:?}"),
        }),
    }
}
