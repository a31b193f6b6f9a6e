//! Output handler traits and types
//!
//! This module defines the trait interface for report renderers and the
//! flattened record shape used by the structured output.

use crate::crawler::SieveReport;
use crate::text::MatchResult;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for OutputError {
    fn from(e: serde_json::Error) -> Self {
        OutputError::Format(e.to_string())
    }
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// One matched posting, flattened for structured output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub id: u64,
    pub by: Option<String>,
    pub time: i64,
    pub url: String,
    pub title: String,

    /// Context snippet of every pattern that matched
    pub matched_keywords: Vec<String>,

    /// Normalized body
    pub text: String,
}

impl MatchRecord {
    /// Builds a record, resolving the permalink against `item_page_url`
    pub fn from_result(result: &MatchResult, item_page_url: &str) -> Self {
        Self {
            id: result.item.id,
            by: result.item.by.clone(),
            time: result.item.time,
            url: result.item.permalink(item_page_url),
            title: result.title.clone(),
            matched_keywords: result.matches.iter().map(|m| m.snippet.clone()).collect(),
            text: result.text.clone(),
        }
    }
}

/// Trait for report renderers
///
/// A renderer turns a finished run into the bytes written to stdout or to
/// the output file.
pub trait OutputHandler {
    /// Renders the full report
    ///
    /// # Arguments
    ///
    /// * `report` - The finished sieve run
    ///
    /// # Returns
    ///
    /// The rendered report, ready to be written as-is
    fn render(&self, report: &SieveReport) -> OutputResult<String>;
}
