//! Error types for the Seiga scraper
//!
//! This module defines all error types used throughout the library.
//! Extraction errors carry no payload; the variant itself names the
//! anchor stage that could not be located.

use thiserror::Error;

/// Error type for Seiga scraper operations
#[derive(Error, Debug)]
pub enum SeigaError {
    /// Comic identifier was empty
    #[error("comic id is empty")]
    EmptyId,

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Requested page was not found (HTTP 404)
    #[error("page not found: {0}")]
    NotFound(String),

    /// Rate limited by the server (HTTP 429)
    #[error("rate limited - too many requests")]
    RateLimited,

    /// The `main_title` block is absent from the page
    #[error("failed to find main title node")]
    MissingTitleBlock,

    /// The title heading inside the `main_title` block is absent
    #[error("failed to find title node")]
    MissingTitleNode,

    /// The author heading inside the `main_title` block is absent
    #[error("failed to find author node")]
    MissingAuthorNode,

    /// The `meta_info` block is absent from the page
    #[error("failed to find meta info node")]
    MissingMetaBlock,

    /// The `episode_list` block is absent from the page
    #[error("failed to find episode list node")]
    MissingEpisodeListBlock,

    /// An episode item has no title link
    #[error("failed to find title node in episode list")]
    MissingEpisodeTitleNode,
}

/// Result type alias for Seiga scraper operations
pub type Result<T> = std::result::Result<T, SeigaError>;
