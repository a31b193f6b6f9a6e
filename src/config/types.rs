use serde::Deserialize;

/// Main configuration structure for HN-Sieve
///
/// Every section is optional in the TOML file; missing keys fall back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub keywords: KeywordConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// HTTP transport and retry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Number of retries after the first attempt
    pub retries: u32,

    /// Base delay for exponential backoff (milliseconds)
    #[serde(rename = "backoff-base-ms")]
    pub backoff_base_ms: u64,

    /// Upper bound on any single backoff delay (milliseconds)
    #[serde(rename = "max-backoff-ms")]
    pub max_backoff_ms: u64,

    /// Status codes treated as transient
    #[serde(rename = "retry-statuses")]
    pub retry_statuses: Vec<u16>,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            backoff_base_ms: 500,
            max_backoff_ms: 30_000,
            retry_statuses: vec![429, 500, 502, 503, 504],
            timeout_secs: 10,
            connect_timeout_secs: 5,
            user_agent: format!("hn-sieve/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Remote endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL for item lookups; `/<id>.json` is appended
    #[serde(rename = "item-endpoint")]
    pub item_endpoint: String,

    /// Search endpoint used to discover the hiring thread
    #[serde(rename = "search-endpoint")]
    pub search_endpoint: String,

    /// Prefix for human-facing item permalinks
    #[serde(rename = "item-page-url")]
    pub item_page_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            item_endpoint: "https://hacker-news.firebaseio.com/v0/item".to_string(),
            search_endpoint: "https://hn.algolia.com/api/v1/search_by_date".to_string(),
            item_page_url: "https://news.ycombinator.com/item?id=".to_string(),
        }
    }
}

/// Traversal behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of concurrent item fetches per wave
    pub workers: u32,

    /// Follow nested replies below the top-level postings
    #[serde(rename = "include-replies")]
    pub include_replies: bool,

    /// Keep expanding the children of deleted or dead items
    #[serde(rename = "explore-deleted-children")]
    pub explore_deleted_children: bool,

    /// Cancel the traversal after this many seconds, keeping partial results
    #[serde(rename = "run-timeout-secs")]
    pub run_timeout_secs: Option<u64>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            include_replies: false,
            explore_deleted_children: true,
            run_timeout_secs: None,
        }
    }
}

/// Keyword filter configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    /// Additional literal keywords, matched case-insensitively
    pub extra: Vec<String>,

    /// When extra keywords are given, results must match at least one of them
    #[serde(rename = "require-extra")]
    pub require_extra: bool,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            extra: Vec::new(),
            require_extra: true,
        }
    }
}

/// Report format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Write the report here instead of stdout
    pub path: Option<String>,
}
