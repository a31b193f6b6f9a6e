//! Per-run traversal state
//!
//! A `FrontierState` is built fresh for every traversal and shared by all of
//! its workers. No lock is ever held across an await point, so aborting a
//! worker mid-fetch cannot leave the state half-updated.

use crate::state::Item;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// What a worker did with one item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// Live item with text, added to `collected`
    Collected,
    /// Live item without a body
    Empty,
    /// Deleted or dead item
    Removed,
    /// Fetch failed after retries
    Failed,
}

/// Shared mutable state of one traversal run
#[derive(Debug, Default)]
pub struct FrontierState {
    visited: Mutex<HashSet<u64>>,
    next_wave: Mutex<Vec<u64>>,
    collected: Mutex<Vec<Item>>,
}

/// Locks a mutex, recovering the data if a worker panicked while holding it
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FrontierState {
    /// Creates the state for a run rooted at `root_id`
    pub fn seeded(root_id: u64) -> Self {
        let state = Self::default();
        state.mark_visited(root_id);
        state
    }

    /// Atomically records `id` as visited
    ///
    /// Returns true only for the first caller; every later discovery of the
    /// same id gets false and must not schedule it again.
    pub fn mark_visited(&self, id: u64) -> bool {
        lock(&self.visited).insert(id)
    }

    pub fn is_visited(&self, id: u64) -> bool {
        lock(&self.visited).contains(&id)
    }

    pub fn visited_count(&self) -> usize {
        lock(&self.visited).len()
    }

    /// Schedules every unvisited child for the next wave, preserving order
    ///
    /// Returns how many ids were newly scheduled.
    pub fn discover(&self, children: &[u64]) -> usize {
        let mut scheduled = 0;
        for &child in children {
            if self.mark_visited(child) {
                lock(&self.next_wave).push(child);
                scheduled += 1;
            }
        }
        scheduled
    }

    /// Drains the ids discovered during the current wave
    pub fn take_next_wave(&self) -> Vec<u64> {
        std::mem::take(&mut *lock(&self.next_wave))
    }

    pub fn collect(&self, item: Item) {
        lock(&self.collected).push(item);
    }

    pub fn collected_count(&self) -> usize {
        lock(&self.collected).len()
    }

    /// Drains the collected items, in completion order
    pub fn take_collected(&self) -> Vec<Item> {
        std::mem::take(&mut *lock(&self.collected))
    }
}

/// Result of a traversal run
#[derive(Debug, Clone)]
pub struct TraversalReport {
    /// The thread root
    pub root: Item,

    /// Live items with non-empty text, in best-effort discovery order
    pub collected: Vec<Item>,

    /// Number of distinct ids scheduled, root included
    pub visited: usize,

    /// Items whose fetch failed after retries
    pub failed: usize,

    /// Deleted or dead items
    pub removed: usize,

    /// Number of completed waves below the root
    pub waves: usize,

    /// True if the run was cancelled before the frontier emptied
    pub cancelled: bool,
}

impl TraversalReport {
    /// Items that were scheduled but are absent from `collected` because of errors
    pub fn skipped(&self) -> usize {
        self.failed
    }
}
