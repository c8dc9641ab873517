//! HTML parsers for Nico Nico Seiga pages
//!
//! This module contains the parser for the comic main page:
//! - `comic`: Extract title, author, serialization dates, and episode list

pub mod comic;

// Re-export main parsing functions
pub use comic::{extract_comic, parse_comic};
