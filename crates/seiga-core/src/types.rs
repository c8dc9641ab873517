//! Data types for the Seiga scraper
//!
//! This module contains the core data structures used throughout the
//! library. All types implement Serialize and Deserialize for JSON
//! compatibility with downstream consumers.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Base URL for Nico Nico Seiga
pub(crate) const SEIGA_BASE_URL: &str = "http://seiga.nicovideo.jp";

/// Date format used on the comic page (zero-padded month and day)
const DATE_FORMAT: &str = "%Y年%m月%d日";

/// Fixed UTC+9 offset (JST) used to interpret dates on the comic page.
///
/// Passed into date construction explicitly so tests can build expected
/// dates without any environment coupling.
pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 60 * 60).unwrap()
}

/// A single episode of a serialized comic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// Display title of the episode
    pub title: String,
    /// Episode URL, with the tracking query suffix stripped
    pub url: String,
}

/// A serialized comic on Nico Nico Seiga
///
/// Built once per extraction and read-only afterwards; repeated
/// extraction of the same page yields an identical value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comic {
    /// Seiga comic identifier (the trailing path segment of the comic URL)
    pub id: String,
    /// Comic title
    pub title: String,
    /// Author name, with the `作者:` label prefix stripped
    pub author: String,
    /// Serialization start date (midnight JST), if present on the page
    pub start: Option<DateTime<FixedOffset>>,
    /// Last update date (midnight JST), if present on the page
    pub update: Option<DateTime<FixedOffset>>,
    /// Episodes in page order
    pub episodes: Vec<Episode>,
}

impl Comic {
    /// Create an empty comic holding only its identifier.
    ///
    /// The remaining fields are populated in one pass by
    /// [`parse_comic`](crate::parser::parse_comic).
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            author: String::new(),
            start: None,
            update: None,
            episodes: Vec::new(),
        }
    }

    /// Canonical URL of the comic's main page.
    ///
    /// Returns an empty string for a comic with an empty identifier; an
    /// uninitialized comic has no URLs rather than erroring.
    pub fn main_url(&self) -> String {
        if self.id.is_empty() {
            return String::new();
        }
        format!("{}/comic/{}", SEIGA_BASE_URL, self.id)
    }

    /// URL of the first episode, or an empty string for an empty identifier.
    pub fn first_episode_url(&self) -> String {
        if self.id.is_empty() {
            return String::new();
        }
        format!("{}/ep1", self.main_url())
    }

    /// URL of the latest episode, or an empty string for an empty identifier.
    pub fn latest_episode_url(&self) -> String {
        if self.id.is_empty() {
            return String::new();
        }
        format!("{}/new", self.main_url())
    }

    /// Number of episodes extracted from the page.
    pub fn episode_count(&self) -> usize {
        self.episodes.len()
    }

    /// Start date rendered the way the page renders it, e.g. `2016年01月02日`.
    pub fn start_date_string(&self) -> Option<String> {
        self.start.map(|d| d.format(DATE_FORMAT).to_string())
    }

    /// Update date rendered the way the page renders it.
    pub fn update_date_string(&self) -> Option<String> {
        self.update.map(|d| d.format(DATE_FORMAT).to_string())
    }
}
