//! Root thread discovery
//!
//! Resolves an optional month ("March 2026") to the id of the matching
//! "Ask HN: Who is hiring?" story through the search API. The search is
//! restricted to stories by the `whoishiring` account; sibling threads that
//! account also posts ("Who wants to be hired?", "Freelancer? Seeking
//! freelancer?") are filtered out by title.

use crate::crawler::fetcher::HttpClient;
use crate::SieveError;
use serde::Deserialize;
use url::Url;

/// Base search phrase
pub const HIRING_QUERY: &str = "Ask HN: Who is hiring?";

/// The discovered thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootThread {
    pub id: u64,
    pub title: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: Option<String>,
    #[serde(rename = "objectID")]
    object_id: Option<String>,
    story_id: Option<u64>,
}

impl SearchHit {
    fn id(&self) -> Option<u64> {
        self.object_id
            .as_deref()
            .and_then(|id| id.parse().ok())
            .or(self.story_id)
    }
}

/// Builds the search phrase, narrowed to a month when one is given
pub fn search_query(month: Option<&str>) -> String {
    match month.map(str::trim).filter(|m| !m.is_empty()) {
        Some(month) => format!("{} ({})", HIRING_QUERY, month),
        None => HIRING_QUERY.to_string(),
    }
}

/// Builds the full search URL for `query`
pub fn search_url(endpoint: &str, query: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(
        endpoint,
        &[
            ("query", query),
            ("tags", "story,author_whoishiring"),
            ("hitsPerPage", "5"),
        ],
    )
}

/// Returns true if `title` names a hiring thread rather than one of its siblings
pub fn is_hiring_thread(title: &str) -> bool {
    let title = title.to_lowercase();
    title.contains("who is hiring") && !title.contains("who wants") && !title.contains("freelancer")
}

/// Picks the first hit that is a hiring thread with a usable id
fn select_thread(hits: &[SearchHit]) -> Option<RootThread> {
    hits.iter().find_map(|hit| {
        let title = hit.title.as_deref()?;
        if !is_hiring_thread(title) {
            return None;
        }
        Some(RootThread {
            id: hit.id()?,
            title: title.to_string(),
        })
    })
}

/// Finds the hiring thread for `month`, or the latest one
///
/// # Returns
///
/// * `Ok(RootThread)` - The thread id and title
/// * `Err(SieveError::ThreadNotFound)` - No hit looked like a hiring thread
/// * `Err(SieveError::Http)` - The search request failed
pub async fn find_thread(
    http: &HttpClient,
    search_endpoint: &str,
    month: Option<&str>,
) -> Result<RootThread, SieveError> {
    let query = search_query(month);
    let url = search_url(search_endpoint, &query)?;

    tracing::info!(
        "Searching for '{}' Who is hiring thread...",
        month.unwrap_or("latest")
    );

    let body = http.fetch(url.as_str()).await?;
    let response: SearchResponse = serde_json::from_slice(&body)?;
    tracing::debug!(hits = response.hits.len(), "Search returned");

    let thread = select_thread(&response.hits).ok_or(SieveError::ThreadNotFound { query })?;
    tracing::info!("Found: {} (id {})", thread.title, thread.id);
    Ok(thread)
}
