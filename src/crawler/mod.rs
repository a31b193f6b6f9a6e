//! Crawler module for thread discovery, item fetching, and traversal
//!
//! This module contains the core fetch-and-aggregate logic, including:
//! - HTTP fetching with retry and backoff
//! - A per-run item cache with single-flight fetches
//! - Wave-based traversal of the comment tree
//! - Discovery of the hiring thread itself
//!
//! `run_sieve` chains all of it with the text stage into one run.

mod cache;
mod coordinator;
mod discovery;
mod fetcher;

pub use cache::ItemCache;
pub use coordinator::{Coordinator, TraversalOptions};
pub use discovery::{find_thread, is_hiring_thread, search_query, search_url, RootThread};
pub use fetcher::{build_http_client, HttpClient, RetryPolicy};

use crate::config::Config;
use crate::output::RunStatistics;
use crate::state::Item;
use crate::text::{normalize_with, KeywordMatcher, MatchResult, NormalizeMode};
use crate::SieveError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// What to sieve
#[derive(Debug, Clone, Default)]
pub struct SieveRequest {
    /// Target month, e.g. "February 2026"; `None` means the latest thread
    pub month: Option<String>,

    /// Use this thread id directly and skip discovery
    pub thread_id: Option<u64>,
}

/// Everything a sieve run produced
#[derive(Debug, Clone)]
pub struct SieveReport {
    pub thread: RootThread,

    /// Matching postings ordered by `(time, id)`
    pub results: Vec<MatchResult>,

    pub statistics: RunStatistics,
}

/// Runs a complete sieve
///
/// This is the main entry point. It will:
/// 1. Compile the keyword policy
/// 2. Build the pooled HTTP client
/// 3. Resolve the thread (search, or the requested id)
/// 4. Traverse the comment tree through a fresh item cache
/// 5. Normalize and filter every collected posting
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `request` - Which thread to sieve
/// * `cancel` - Cancelling it stops the traversal and keeps partial results
///
/// # Returns
///
/// * `Ok(SieveReport)` - Run completed, possibly with skipped items or cancelled early
/// * `Err(SieveError)` - A fatal error: thread not found, root fetch failed, bad config
/// * `Err(SieveError::Cancelled)` - Cancelled before the thread root was fetched
///
/// # Example
///
/// ```no_run
/// use hn_sieve::config::Config;
/// use hn_sieve::crawler::{run_sieve, SieveRequest};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_sieve(&Config::default(), &SieveRequest::default(), CancellationToken::new()).await?;
/// println!("{} matches in {}", report.results.len(), report.thread.title);
/// # Ok(())
/// # }
/// ```
pub async fn run_sieve(
    config: &Config,
    request: &SieveRequest,
    cancel: CancellationToken,
) -> Result<SieveReport, SieveError> {
    let run_token = cancel.child_token();
    let timer = config
        .crawler
        .run_timeout_secs
        .map(|secs| spawn_timeout(run_token.clone(), Duration::from_secs(secs)));

    let outcome = sieve(config, request, run_token).await;

    if let Some(timer) = timer {
        timer.abort();
    }
    outcome
}

/// Body of `run_sieve`, bounded by `cancel` from discovery onwards
async fn sieve(
    config: &Config,
    request: &SieveRequest,
    cancel: CancellationToken,
) -> Result<SieveReport, SieveError> {
    let start_time = Instant::now();

    let matcher = KeywordMatcher::new(&config.keywords.extra)?
        .require_extra(config.keywords.require_extra);
    let options = TraversalOptions::from_config(&config.crawler);
    let http = HttpClient::new(&config.http, options.workers)?;

    let discovered = match request.thread_id {
        Some(id) => {
            tracing::info!("Using thread id {} (search skipped)", id);
            None
        }
        None => {
            let search = find_thread(&http, &config.api.search_endpoint, request.month.as_deref());
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::warn!("Run cancelled during thread search");
                    return Err(SieveError::Cancelled);
                }
                found = search => Some(found?),
            }
        }
    };
    let root_id = discovered
        .as_ref()
        .map(|thread| thread.id)
        .or(request.thread_id)
        .ok_or_else(|| SieveError::ThreadNotFound {
            query: search_query(request.month.as_deref()),
        })?;

    tracing::info!(
        "Downloading comments (workers={}, replies={}) ...",
        options.workers,
        options.include_replies
    );

    let cache = Arc::new(ItemCache::new(http, &config.api.item_endpoint));
    let coordinator = Coordinator::new(cache.clone(), options).with_cancellation(cancel);
    let traversal = coordinator.run(root_id).await?;

    let thread = discovered.unwrap_or_else(|| RootThread {
        id: root_id,
        title: traversal
            .root
            .title
            .clone()
            .unwrap_or_else(|| format!("Item {}", root_id)),
    });

    tracing::info!(
        "Got {} valid comments ({} network calls)",
        traversal.collected.len(),
        cache.network_calls()
    );
    tracing::info!("Filtering for part-time / contract / freelance...");

    let collected = traversal.collected.len();
    let results = filter_items(&matcher, traversal.collected, NormalizeMode::default());
    tracing::info!("Found {} part-time opportunities", results.len());

    let statistics = RunStatistics {
        thread_title: thread.title.clone(),
        visited: traversal.visited,
        collected,
        matched: results.len(),
        failed: traversal.failed,
        removed: traversal.removed,
        waves: traversal.waves,
        cancelled: traversal.cancelled,
        elapsed: start_time.elapsed(),
    };

    Ok(SieveReport {
        thread,
        results,
        statistics,
    })
}

/// Normalizes and filters collected items, ordering the survivors by `(time, id)`
pub fn filter_items(
    matcher: &KeywordMatcher,
    items: Vec<Item>,
    mode: NormalizeMode,
) -> Vec<MatchResult> {
    let mut results: Vec<MatchResult> = items
        .into_iter()
        .filter_map(|item| {
            let text = normalize_with(item.text.as_deref().unwrap_or_default(), mode);
            matcher.evaluate(item, text)
        })
        .collect();

    results.sort_by_key(|r| (r.item.time, r.item.id));
    results
}

/// Cancels `token` once `after` has elapsed
fn spawn_timeout(token: CancellationToken, after: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        tracing::warn!("Run timeout of {:?} reached, cancelling run", after);
        token.cancel();
    })
}
