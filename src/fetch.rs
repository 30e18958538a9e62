//! Page fetching.
//!
//! Every page is requested with a single GET. The fetcher never fails: a
//! not-found page, any other HTTP error status and any transport error all
//! come back as [`RawDocument::Absent`]. Only not-found is the expected
//! "nothing published for that month" signal; the others are logged at
//! `warn` so a long scrape can still be diagnosed afterwards.
//!
//! The orchestrator talks to the network through the [`PageSource`] trait,
//! which lets tests substitute an in-memory source.

use crate::models::{PageAddress, RawDocument};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder, StatusCode};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// User agent sent with every request unless overridden.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; academic-research/1.0)";

/// Per-request timeout unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Errors raised while building an [`HttpFetcher`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Anything that can turn a [`PageAddress`] into a [`RawDocument`].
#[allow(async_fn_in_trait)]
pub trait PageSource {
    /// Fetch the page at `address`. Implementations must not fail; any
    /// problem is reported as [`RawDocument::Absent`].
    async fn fetch(&self, address: &PageAddress) -> RawDocument;
}

/// Request headers and timeout applied to every fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub headers: BTreeMap<String, String>,
    pub timeout: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            headers: default_headers(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Headers sent when the caller supplies none.
pub fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([("User-Agent".to_string(), DEFAULT_USER_AGENT.to_string())])
}

fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, FetchError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| FetchError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| FetchError::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// Client builder carrying the headers and timeout from `settings`.
pub(crate) fn client_builder(settings: &FetchSettings) -> Result<ClientBuilder, FetchError> {
    Ok(Client::builder()
        .default_headers(header_map(&settings.headers)?)
        .timeout(settings.timeout))
}

/// [`PageSource`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher whose client sends `settings.headers` and gives up
    /// after `settings.timeout`.
    pub fn new(settings: &FetchSettings) -> Result<Self, FetchError> {
        let client = client_builder(settings)?.build()?;
        Ok(Self { client })
    }

    /// Wrap an already configured client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl PageSource for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%address))]
    async fn fetch(&self, address: &PageAddress) -> RawDocument {
        let t0 = Instant::now();
        let response = match self.client.get(address.as_str()).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(elapsed_ms = t0.elapsed().as_millis() as u64, error = %e, "Request failed; treating page as absent");
                return RawDocument::Absent;
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("Page not found");
            return RawDocument::Absent;
        }
        if status.is_client_error() || status.is_server_error() {
            warn!(%status, "HTTP error status; treating page as absent");
            return RawDocument::Absent;
        }

        match response.text().await {
            Ok(body) => {
                debug!(
                    %status,
                    bytes = body.len(),
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    "Fetched page"
                );
                RawDocument::Content(body)
            }
            Err(e) => {
                warn!(error = %e, "Failed to read response body; treating page as absent");
                RawDocument::Absent
            }
        }
    }
}

/// Fetch a single page with the given headers and timeout.
///
/// Convenience wrapper that builds a one-off [`HttpFetcher`]. Headers that
/// are not valid HTTP also produce [`RawDocument::Absent`].
#[instrument(level = "debug", skip(headers))]
pub async fn fetch(
    address: &PageAddress,
    headers: &BTreeMap<String, String>,
    timeout: Duration,
) -> RawDocument {
    let settings = FetchSettings {
        headers: headers.clone(),
        timeout,
    };
    match HttpFetcher::new(&settings) {
        Ok(fetcher) => fetcher.fetch(address).await,
        Err(e) => {
            warn!(error = %e, "Could not build HTTP client; treating page as absent");
            RawDocument::Absent
        }
    }
}
