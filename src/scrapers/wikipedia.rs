//! Wikipedia "On this day" page fetcher.
//!
//! Wikipedia rejects anonymous clients, so every request carries a
//! `User-Agent` of the form
//! `otd-cli/<version> (<origin-url>; <contact-email>)`.
//! The origin URL and contact email come from configuration
//! (`OTD_ORIGIN_URL`, `OTD_CONTACT_EMAIL`) with built-in defaults.

use super::{FetchError, PageSource};
use crate::utils::truncate_for_log;
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// The page every invocation reads.
pub const TODAY_URL: &str = "https://en.wikipedia.org/wiki/Wikipedia:On_this_day/Today";

/// Product token sent in the `User-Agent` header.
pub const PRODUCT: &str = "otd-cli";

pub const DEFAULT_ORIGIN_URL: &str = "https://github.com/gabezeck/otd-cli";
pub const DEFAULT_CONTACT_EMAIL: &str = "contact@example.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Everything the fetcher needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Page to GET.
    pub url: Url,
    /// Project homepage advertised in the `User-Agent`.
    pub origin_url: String,
    /// Contact address advertised in the `User-Agent`.
    pub contact_email: String,
    /// Upper bound on the whole exchange.
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url: Url::parse(TODAY_URL).expect("TODAY_URL is a valid URL"),
            origin_url: DEFAULT_ORIGIN_URL.to_string(),
            contact_email: DEFAULT_CONTACT_EMAIL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl FetchConfig {
    /// `User-Agent` header value, e.g.
    /// `otd-cli/0.1.0 (https://github.com/gabezeck/otd-cli; contact@example.com)`.
    pub fn user_agent(&self) -> String {
        format!(
            "{}/{} ({}; {})",
            PRODUCT,
            env!("CARGO_PKG_VERSION"),
            self.origin_url,
            self.contact_email
        )
    }
}

/// Fetches the page over HTTPS with a preconfigured client.
#[derive(Debug)]
pub struct WikipediaFetcher {
    client: Client,
    url: Url,
}

impl WikipediaFetcher {
    /// Build the HTTP client used for every fetch.
    ///
    /// # Arguments
    ///
    /// * `config` - Page URL, `User-Agent` parts and request timeout
    ///
    /// # Returns
    ///
    /// A fetcher that sends one GET to `config.url` per [`PageSource::fetch`].
    ///
    /// # Errors
    ///
    /// [`FetchError::Transport`] if the TLS backend cannot start.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent())
            .timeout(config.timeout)
            .build()?;

        debug!(url = %config.url, user_agent = %config.user_agent(), "Built page fetcher");
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

impl PageSource for WikipediaFetcher {
    /// GET the page. Only `200 OK` counts as success; any other status is
    /// [`FetchError::Status`], and connection or timeout failures are
    /// [`FetchError::Transport`].
    #[instrument(level = "info", skip_all, fields(url = %self.url))]
    async fn fetch(&self) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let response = self.client.get(self.url.clone()).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(code = status.as_u16(), "Page fetch returned non-success status");
            return Err(FetchError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let html = response.text().await?;
        info!(
            bytes = html.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        debug!(preview = %truncate_for_log(&html, 200), "Page body");
        Ok(html)
    }
}
