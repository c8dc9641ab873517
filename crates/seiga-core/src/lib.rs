//! Seiga Scraper Core Library
//!
//! This crate extracts structured metadata for serialized comics on
//! Nico Nico Seiga (seiga.nicovideo.jp).
//!
//! # Features
//! - Fetch a comic's main page and extract title, author, and dates
//! - Extract the full episode list (titles and de-tracked URLs)
//! - Derive canonical comic URLs from an identifier
//! - Request-spacing HTTP client with retry to avoid server overload

pub mod client;
pub mod error;
pub mod parser;
pub mod scraper;
pub mod types;

// Re-export main types for convenience
pub use client::{FetchConfig, SeigaClient};
pub use error::{Result, SeigaError};
pub use scraper::SeigaScraper;
pub use types::{jst, Comic, Episode};
