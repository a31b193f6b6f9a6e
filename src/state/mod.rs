//! State module for the discussion tree and traversal progress
//!
//! # Components
//!
//! - `Item`: an immutable story or comment decoded from the item API
//! - `FrontierState`: visited set, next wave, and collected items for one run
//! - `TraversalReport`: what a finished (or cancelled) run hands back

mod frontier;
mod item;

// Re-export main types
pub use frontier::{FrontierState, TraversalReport, WorkerOutcome};
pub use item::{Item, ItemKind};
