//! Text processing for fetched postings
//!
//! This module turns raw item bodies into plain text and decides which
//! postings are of interest:
//! - Markup stripping and entity decoding
//! - Keyword matching with context snippets
//! - Title extraction from the first line of a posting

mod matcher;
mod normalize;

pub use matcher::{
    snippet, KeywordMatch, KeywordMatcher, MatchResult, PatternSource, BUILTIN_PATTERNS,
    SNIPPET_RADIUS,
};
pub use normalize::{normalize, normalize_with, NormalizeMode};

/// Maximum title length in characters
pub const TITLE_MAX_CHARS: usize = 120;

/// Returns the first non-empty line as a rough title
///
/// Hiring posts conventionally open with `Company | Role | Location`, so
/// the first line doubles as a headline.
///
/// # Examples
///
/// ```
/// use hn_sieve::text::first_line;
///
/// assert_eq!(first_line("\n\nCompany X - Part time role\nDetails"), "Company X - Part time role");
/// assert_eq!(first_line("   "), "(no title)");
/// ```
pub fn first_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.chars().take(TITLE_MAX_CHARS).collect())
        .unwrap_or_else(|| "(no title)".to_string())
}
