//! Main Seiga scraper API
//!
//! This module provides the high-level API for scraping comic pages on
//! seiga.nicovideo.jp. It combines the HTTP client with the page parser
//! to fetch and extract a comic in one call.

use tracing::debug;

use crate::client::SeigaClient;
use crate::error::{Result, SeigaError};
use crate::parser::parse_comic;
use crate::types::{Comic, SEIGA_BASE_URL};

/// Main scraper API for seiga.nicovideo.jp
///
/// # Example
/// ```no_run
/// use seiga_core::SeigaScraper;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scraper = SeigaScraper::new()?;
///
///     let comic = scraper.fetch_comic("9999").await?;
///     println!("{} ({} episodes)", comic.title, comic.episode_count());
///
///     Ok(())
/// }
/// ```
pub struct SeigaScraper {
    client: SeigaClient,
    base_url: String,
}

impl SeigaScraper {
    /// Create a new scraper with default configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        let client = SeigaClient::new()?;
        Ok(Self::with_client(client))
    }

    /// Create a new scraper with a custom client.
    ///
    /// This is useful when you need custom client configuration.
    ///
    /// # Arguments
    /// * `client` - Pre-configured SeigaClient instance
    pub fn with_client(client: SeigaClient) -> Self {
        Self {
            client,
            base_url: SEIGA_BASE_URL.to_string(),
        }
    }

    /// Create a new scraper pointed at a different host.
    ///
    /// Intended for tests that serve recorded pages from a local server.
    pub fn with_base_url(client: SeigaClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Fetch a comic's main page and extract its metadata.
    ///
    /// # Arguments
    /// * `id` - Seiga comic identifier, e.g. `"9999"`
    ///
    /// # Returns
    /// * `Ok(Comic)` with title, author, dates, and episode list populated
    /// * `Err(SeigaError::EmptyId)` if the identifier is empty
    /// * `Err(SeigaError::NotFound)` if the page does not exist
    /// * Any parse failure from [`parse_comic`], naming the missing region
    ///
    /// # Example
    /// ```no_run
    /// use seiga_core::SeigaScraper;
    ///
    /// # async fn example() -> Result<(), seiga_core::SeigaError> {
    /// let scraper = SeigaScraper::new()?;
    /// let comic = scraper.fetch_comic("9999").await?;
    /// for episode in &comic.episodes {
    ///     println!("{}: {}", episode.title, episode.url);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch_comic(&self, id: &str) -> Result<Comic> {
        if id.is_empty() {
            return Err(SeigaError::EmptyId);
        }

        let url = format!("{}/comic/{}", self.base_url, id);
        debug!(id, url = %url, "fetching comic page");

        let html = self.client.fetch(&url).await?;
        let comic = parse_comic(&html, id)?;

        debug!(id, episodes = comic.episode_count(), "comic extracted");
        Ok(comic)
    }
}
