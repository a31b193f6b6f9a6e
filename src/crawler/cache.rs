//! Item cache for a single run
//!
//! Every item lookup of a traversal goes through one `ItemCache`. Each id
//! owns a `OnceCell`, so concurrent requests for the same uncached id wait on
//! a single in-flight fetch instead of issuing their own. A failed fetch
//! leaves its cell empty: errors are never cached, and the next caller
//! simply tries again.
//!
//! Entries are never evicted; a cache lives exactly as long as its run.

use crate::crawler::fetcher::HttpClient;
use crate::state::Item;
use crate::{FetchError, FetchResult, HttpError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;

/// Concurrency-safe id → item store backed by the item API
#[derive(Debug)]
pub struct ItemCache {
    http: HttpClient,
    item_endpoint: String,
    entries: Mutex<HashMap<u64, Arc<OnceCell<Item>>>>,
    network_calls: AtomicUsize,
}

impl ItemCache {
    /// Creates an empty cache fetching from `<item_endpoint>/<id>.json`
    pub fn new(http: HttpClient, item_endpoint: &str) -> Self {
        Self {
            http,
            item_endpoint: item_endpoint.trim_end_matches('/').to_string(),
            entries: Mutex::new(HashMap::new()),
            network_calls: AtomicUsize::new(0),
        }
    }

    /// URL of the JSON resource for `id`
    pub fn item_url(&self, id: u64) -> String {
        format!("{}/{}.json", self.item_endpoint, id)
    }

    /// Returns the cached item, fetching it on first use
    ///
    /// # Returns
    ///
    /// * `Ok(Item)` - The item, from cache or freshly fetched
    /// * `Err(FetchError::NotFound)` - HTTP 404 or a `null` payload
    /// * `Err(FetchError::Malformed)` - The payload is not a valid item
    /// * `Err(FetchError::Http)` - Network failure after retries, or another status
    pub async fn get_or_fetch(&self, id: u64) -> FetchResult {
        let cell = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            entries.entry(id).or_default().clone()
        };

        cell.get_or_try_init(|| self.fetch(id)).await.cloned()
    }

    /// Returns the item only if it is already cached
    pub fn get(&self, id: u64) -> Option<Item> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(&id).and_then(|cell| cell.get().cloned())
    }

    /// Number of items successfully cached
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.values().filter(|cell| cell.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of fetches that reached the HTTP layer
    pub fn network_calls(&self) -> usize {
        self.network_calls.load(Ordering::Relaxed)
    }

    async fn fetch(&self, id: u64) -> FetchResult {
        self.network_calls.fetch_add(1, Ordering::Relaxed);
        let url = self.item_url(id);

        let payload = self.http.fetch(&url).await.map_err(|e| match e {
            HttpError::Status { status: 404, .. } => FetchError::NotFound { id },
            other => FetchError::Http(other),
        })?;

        let item = Item::from_json(id, &payload)?;
        tracing::trace!(item_id = id, kind = %item.kind, "Fetched item");
        Ok(item)
    }
}
