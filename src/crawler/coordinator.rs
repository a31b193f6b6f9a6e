//! Traversal coordinator - wave-based frontier expansion
//!
//! This module walks a comment tree whose shape is only known as items
//! arrive:
//! - Fetching the root and seeding the frontier with its children
//! - Dispatching each wave to a bounded pool of worker tasks
//! - Collecting live items with text, discovering their children
//! - Waiting for the whole wave before scheduling the next one
//! - Stopping early on cancellation while keeping partial results

use crate::config::CrawlerConfig;
use crate::crawler::cache::ItemCache;
use crate::state::{FrontierState, TraversalReport, WorkerOutcome};
use crate::SieveError;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Knobs for one traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalOptions {
    /// Maximum concurrent fetches within a wave
    pub workers: usize,

    /// Expand children below the top-level postings
    pub include_replies: bool,

    /// Expand children of deleted or dead items
    pub explore_deleted_children: bool,
}

impl TraversalOptions {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            workers: config.workers.max(1) as usize,
            include_replies: config.include_replies,
            explore_deleted_children: config.explore_deleted_children,
        }
    }
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self::from_config(&CrawlerConfig::default())
    }
}

/// Per-wave outcome counts
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct WaveTally {
    collected: usize,
    empty: usize,
    removed: usize,
    failed: usize,
    cancelled: bool,
}

impl WaveTally {
    fn record(&mut self, outcome: WorkerOutcome) {
        match outcome {
            WorkerOutcome::Collected => self.collected += 1,
            WorkerOutcome::Empty => self.empty += 1,
            WorkerOutcome::Removed => self.removed += 1,
            WorkerOutcome::Failed => self.failed += 1,
        }
    }
}

/// Main traversal coordinator
///
/// A coordinator may run several traversals; each one gets a fresh
/// `FrontierState`. Only the item cache is shared between them.
pub struct Coordinator {
    cache: Arc<ItemCache>,
    options: TraversalOptions,
    cancel: CancellationToken,
}

impl Coordinator {
    /// Creates a new coordinator
    ///
    /// # Arguments
    ///
    /// * `cache` - The item cache every worker fetches through
    /// * `options` - Worker count and expansion rules
    pub fn new(cache: Arc<ItemCache>, options: TraversalOptions) -> Self {
        Self {
            cache,
            options,
            cancel: CancellationToken::new(),
        }
    }

    /// Attaches a token that stops the traversal when cancelled
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cache(&self) -> &ItemCache {
        &self.cache
    }

    pub fn options(&self) -> &TraversalOptions {
        &self.options
    }

    /// Runs a traversal rooted at `root_id`
    ///
    /// The root is fetched first; failing to fetch it is the only fatal
    /// outcome. Its direct children always form the first wave. Later waves
    /// exist only when replies are included.
    ///
    /// # Returns
    ///
    /// * `Ok(TraversalReport)` - Collected items plus skip counts, possibly partial
    /// * `Err(SieveError::RootFetchFailed)` - The root could not be fetched
    /// * `Err(SieveError::Cancelled)` - Cancelled before the root arrived
    pub async fn run(&self, root_id: u64) -> Result<TraversalReport, SieveError> {
        let start_time = Instant::now();
        let state = Arc::new(FrontierState::seeded(root_id));

        tracing::debug!(item_id = root_id, "Fetching root item");
        let root = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                tracing::warn!(item_id = root_id, "Traversal cancelled while fetching root");
                return Err(SieveError::Cancelled);
            }
            fetched = self.cache.get_or_fetch(root_id) => {
                fetched.map_err(|source| SieveError::RootFetchFailed {
                    id: root_id,
                    source,
                })?
            }
        };

        if !root.is_removed() || self.options.explore_deleted_children {
            state.discover(&root.children);
        }
        tracing::info!(
            "Root item {} has {} top-level children",
            root_id,
            root.children.len()
        );

        let mut totals = WaveTally::default();
        let mut waves = 0;

        loop {
            let pending = state.take_next_wave();
            if pending.is_empty() {
                tracing::debug!("Frontier is empty, traversal complete");
                break;
            }

            if self.cancel.is_cancelled() {
                totals.cancelled = true;
                break;
            }

            waves += 1;
            let wave_size = pending.len();
            let tally = self
                .run_wave(&state, pending, self.options.include_replies)
                .await;

            totals.collected += tally.collected;
            totals.empty += tally.empty;
            totals.removed += tally.removed;
            totals.failed += tally.failed;

            tracing::info!(
                "Wave {}: {} items fetched, {} collected so far, {} failed",
                waves,
                wave_size,
                state.collected_count(),
                totals.failed
            );

            if tally.cancelled {
                totals.cancelled = true;
                break;
            }
        }

        if totals.cancelled {
            tracing::warn!(
                "Traversal cancelled after {} waves; returning {} partial results",
                waves,
                state.collected_count()
            );
        }

        tracing::debug!(
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            empty = totals.empty,
            "Traversal finished"
        );

        Ok(TraversalReport {
            root,
            visited: state.visited_count(),
            collected: state.take_collected(),
            failed: totals.failed,
            removed: totals.removed,
            waves,
            cancelled: totals.cancelled,
        })
    }

    /// Fetches one wave and blocks until every worker has finished
    ///
    /// On cancellation the remaining workers are aborted. Their results are
    /// dropped, and nothing they had already written is undone.
    async fn run_wave(
        &self,
        state: &Arc<FrontierState>,
        pending: Vec<u64>,
        expand: bool,
    ) -> WaveTally {
        let permits = Arc::new(Semaphore::new(self.options.workers));
        let mut tasks = JoinSet::new();

        for id in pending {
            let permits = permits.clone();
            let cache = self.cache.clone();
            let state = state.clone();
            let explore_removed = self.options.explore_deleted_children;

            tasks.spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return WorkerOutcome::Failed;
                };
                process_item(&cache, &state, id, expand, explore_removed).await
            });
        }

        let mut tally = WaveTally::default();
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tasks.abort_all();
                    while let Some(joined) = tasks.join_next().await {
                        if let Ok(outcome) = joined {
                            tally.record(outcome);
                        }
                    }
                    tally.cancelled = true;
                    break;
                }
                joined = tasks.join_next() => match joined {
                    Some(Ok(outcome)) => tally.record(outcome),
                    Some(Err(e)) => {
                        tracing::warn!("Worker task failed: {}", e);
                        tally.failed += 1;
                    }
                    None => break,
                },
            }
        }

        tally
    }
}

/// Worker body: fetch one item, expand it, and collect it if it qualifies
async fn process_item(
    cache: &ItemCache,
    state: &FrontierState,
    id: u64,
    expand: bool,
    explore_removed: bool,
) -> WorkerOutcome {
    let item = match cache.get_or_fetch(id).await {
        Ok(item) => item,
        Err(e) => {
            tracing::warn!(item_id = id, "Skipping item: {}", e);
            return WorkerOutcome::Failed;
        }
    };

    if expand && (!item.is_removed() || explore_removed) {
        let scheduled = state.discover(&item.children);
        if scheduled > 0 {
            tracing::trace!(item_id = id, scheduled, "Discovered replies");
        }
    }

    if item.is_removed() {
        return WorkerOutcome::Removed;
    }

    if !item.has_text() {
        return WorkerOutcome::Empty;
    }

    state.collect(item);
    WorkerOutcome::Collected
}
