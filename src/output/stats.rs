//! Run statistics
//!
//! This module summarizes a finished sieve run for the log.

use std::time::Duration;

/// Sieve run statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStatistics {
    /// Title of the sieved thread
    pub thread_title: String,

    /// Distinct item ids scheduled, root included
    pub visited: usize,

    /// Live postings with text
    pub collected: usize,

    /// Postings that passed the keyword filter
    pub matched: usize,

    /// Items skipped after failed fetches
    pub failed: usize,

    /// Deleted or dead items
    pub removed: usize,

    /// Completed traversal waves
    pub waves: usize,

    /// True if the traversal stopped early
    pub cancelled: bool,

    pub elapsed: Duration,
}

impl RunStatistics {
    /// Returns the match rate over collected postings as a percentage
    pub fn match_rate(&self) -> f64 {
        if self.collected == 0 {
            return 0.0;
        }
        (self.matched as f64 / self.collected as f64) * 100.0
    }
}

/// Logs statistics at info level, with a warning for skipped items
///
/// # Arguments
///
/// * `stats` - The statistics to log
pub fn log_statistics(stats: &RunStatistics) {
    tracing::info!("=== Sieve Statistics ===");
    tracing::info!("  Thread: {}", stats.thread_title);
    tracing::info!(
        "  Items visited: {} over {} waves",
        stats.visited,
        stats.waves
    );
    tracing::info!(
        "  Postings collected: {}, matched: {} ({:.1}%)",
        stats.collected,
        stats.matched,
        stats.match_rate()
    );
    tracing::info!("  Deleted or dead: {}", stats.removed);
    tracing::info!("  Elapsed: {:.2}s", stats.elapsed.as_secs_f64());

    if stats.failed > 0 {
        tracing::warn!("{} items could not be fetched and were skipped", stats.failed);
    }
    if stats.cancelled {
        tracing::warn!("Run was cancelled; results are partial");
    }
}
