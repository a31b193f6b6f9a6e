//! Plain-text report generation
//!
//! This module renders a human-readable report: a banner naming the
//! thread, then one block per matching posting with its author, date,
//! permalink, the matched snippets and the cleaned body.

use crate::crawler::SieveReport;
use crate::output::traits::{OutputHandler, OutputResult};
use crate::text::MatchResult;
use chrono::{DateTime, Utc};

const BANNER_WIDTH: usize = 80;
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Renders the plain-text report
#[derive(Debug, Clone)]
pub struct TextReport {
    item_page_url: String,
}

impl TextReport {
    pub fn new(item_page_url: &str) -> Self {
        Self {
            item_page_url: item_page_url.to_string(),
        }
    }
}

impl OutputHandler for TextReport {
    fn render(&self, report: &SieveReport) -> OutputResult<String> {
        Ok(format_text_report(report, &self.item_page_url, Utc::now()))
    }
}

/// Formats a sieve report as plain text
///
/// # Arguments
///
/// * `report` - The finished sieve run
/// * `item_page_url` - Prefix that turns an item id into a permalink
/// * `generated_at` - Timestamp printed in the banner
///
/// # Returns
///
/// The formatted report
pub fn format_text_report(
    report: &SieveReport,
    item_page_url: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let rule = "═".repeat(BANNER_WIDTH);

    out.push_str(&rule);
    out.push('\n');
    out.push_str("  HN 'Who is Hiring?' - Part-Time Opportunities\n");
    out.push_str(&format!("  Thread: {}\n", report.thread.title));
    out.push_str(&format!("  Results: {} matches\n", report.results.len()));
    out.push_str(&format!(
        "  Generated: {} UTC\n",
        generated_at.format(DATE_FORMAT)
    ));
    if report.statistics.cancelled {
        out.push_str("  Note: run was cancelled, results are partial\n");
    }
    out.push_str(&rule);
    out.push_str("\n\n");

    let blocks: Vec<String> = report
        .results
        .iter()
        .map(|r| format_match(r, item_page_url))
        .collect();
    out.push_str(&blocks.join("\n"));

    out
}

/// Formats one matching posting
pub fn format_match(result: &MatchResult, item_page_url: &str) -> String {
    let mut block = String::new();
    let snippets: Vec<&str> = result.matches.iter().map(|m| m.snippet.as_str()).collect();

    block.push_str(&"─".repeat(BANNER_WIDTH));
    block.push('\n');
    block.push_str(&format!("{}\n", result.title));
    block.push_str(&format!(
        "   by {} | {}\n",
        result.item.by.as_deref().unwrap_or("unknown"),
        format_time(result.item.time)
    ));
    block.push_str(&format!("   {}\n", result.item.permalink(item_page_url)));
    block.push_str(&format!("   Matched: {}\n", snippets.join(", ")));
    block.push_str(&format!("\n{}\n", result.text));

    block
}

/// Formats a Unix timestamp, or `?` when it is missing or out of range
fn format_time(timestamp: i64) -> String {
    if timestamp == 0 {
        return "?".to_string();
    }
    DateTime::from_timestamp(timestamp, 0)
        .map(|t| t.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "?".to_string())
}
