//! HTTP fetch layer for seiga.nicovideo.jp
//!
//! Everything transport related lives here: request spacing, retry of
//! transient failures, and status-code mapping. The parser never sees
//! the network.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::StatusCode;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::{Result, SeigaError};

/// User-Agent sent with every request
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Accept-Language for the Japanese page variant
const ACCEPT_LANGUAGE_JA: &str = "ja,en-US;q=0.9,en;q=0.8";

/// Tunables for the fetch layer
///
/// The defaults suit polite scraping of the live site; tests shrink the
/// spacing and backoff to keep the retry loop fast.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Minimum spacing between two requests to the server
    pub request_interval: Duration,
    /// Per-request timeout
    pub timeout: Duration,
    /// Total attempts per URL, counting the first request
    pub max_attempts: u32,
    /// Backoff before the first retry; doubles on each further retry
    pub initial_backoff: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_interval: Duration::from_millis(500),
            timeout: Duration::from_secs(30),
            max_attempts: 4,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

/// HTTP client for seiga.nicovideo.jp
///
/// Spaces requests `request_interval` apart and retries 429/5xx answers
/// with doubling backoff until the attempt budget is spent. A 404 is
/// final immediately; the comic does not exist.
pub struct SeigaClient {
    http: reqwest::Client,
    config: FetchConfig,
    /// Earliest moment the next request may be sent
    next_slot: Mutex<Instant>,
}

impl SeigaClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(FetchConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn with_config(config: FetchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_JA));

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            config,
            next_slot: Mutex::new(Instant::now()),
        })
    }

    /// Wait for the next request slot and book the one after it.
    async fn throttle(&self) {
        let mut slot = self.next_slot.lock().await;
        let now = Instant::now();
        if *slot > now {
            sleep(*slot - now).await;
        }
        *slot = Instant::now() + self.config.request_interval;
    }

    /// Fetch HTML content from an absolute URL
    ///
    /// # Arguments
    /// * `url` - Absolute URL, e.g. one produced by
    ///   [`Comic::main_url`](crate::types::Comic::main_url)
    ///
    /// # Returns
    /// The HTML content as a string
    ///
    /// # Errors
    /// - `SeigaError::NotFound` - the server answered 404
    /// - `SeigaError::RateLimited` - 429 persisted through the whole
    ///   attempt budget
    /// - `SeigaError::Http` - network failure, or any other status that
    ///   survived the budget
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let mut backoff = self.config.initial_backoff;
        let mut attempt = 1;

        loop {
            self.throttle().await;

            debug!(url, attempt, "requesting page");
            let response = self.http.get(url).send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response.text().await?);
            }
            if status == StatusCode::NOT_FOUND {
                return Err(SeigaError::NotFound(url.to_string()));
            }

            let transient = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            if transient && attempt < self.config.max_attempts {
                debug!(url, attempt, %status, ?backoff, "transient failure, backing off");
                sleep(backoff).await;
                backoff *= 2;
                attempt += 1;
                continue;
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(SeigaError::RateLimited);
            }

            // Exhausted 5xx and any remaining 4xx map through reqwest's
            // own status error.
            let response = response.error_for_status()?;
            return Ok(response.text().await?);
        }
    }
}
