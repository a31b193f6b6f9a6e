//! HN-Sieve: a part-time job finder for Hacker News hiring threads
//!
//! This crate locates the monthly "Ask HN: Who is hiring?" thread, walks its
//! comment tree wave by wave through a bounded pool of concurrent fetches,
//! and filters every posting against a keyword policy that signals part-time,
//! contract, or freelance work.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod text;

use thiserror::Error;

/// Main error type for HN-Sieve operations
#[derive(Debug, Error)]
pub enum SieveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Failed to fetch root item {id}: {source}")]
    RootFetchFailed { id: u64, source: FetchError },

    #[error("Could not find a 'Who is hiring?' thread for query '{query}'")]
    ThreadNotFound { query: String },

    /// Cancelled before the thread root was available, so nothing was collected
    #[error("Run cancelled before the thread root was fetched")]
    Cancelled,

    #[error("Invalid keyword pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Errors surfaced by the HTTP client layer
#[derive(Debug, Error)]
pub enum HttpError {
    /// Transient failure that outlived every retry
    #[error("Network error for {url} after {attempts} attempt(s): {reason}")]
    Network {
        url: String,
        attempts: u32,
        reason: String,
    },

    /// Non-transient status, surfaced without retry
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid request for {url}: {reason}")]
    Request { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns true if this error is a terminal network failure
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Returns the HTTP status code, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Outcome of a failed item fetch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Item {id} not found")]
    NotFound { id: u64 },

    #[error("Malformed payload for item {id}: {reason}")]
    Malformed { id: u64, reason: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for HN-Sieve operations
pub type Result<T> = std::result::Result<T, SieveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for item fetches
pub type FetchResult = std::result::Result<state::Item, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_sieve, SieveReport};
pub use state::{Item, ItemKind, TraversalReport};
pub use text::{normalize, KeywordMatch, KeywordMatcher, MatchResult};
