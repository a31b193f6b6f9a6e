//! Output module for rendering sieve reports
//!
//! This module handles:
//! - Rendering matches as plain text or JSON
//! - Writing the report to stdout or a file
//! - Summarizing run statistics

mod json;
pub mod stats;
mod text;
mod traits;

pub use json::JsonReport;
pub use stats::{log_statistics, RunStatistics};
pub use text::{format_match, format_text_report, TextReport};
pub use traits::{MatchRecord, OutputError, OutputHandler, OutputResult};

use crate::config::OutputFormat;
use crate::crawler::SieveReport;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Returns the renderer for `format`
pub fn handler_for(format: OutputFormat, item_page_url: &str) -> Box<dyn OutputHandler> {
    match format {
        OutputFormat::Text => Box::new(TextReport::new(item_page_url)),
        OutputFormat::Json => Box::new(JsonReport::new(item_page_url)),
    }
}

/// Renders a report and writes it to `path`, or to stdout when `path` is `None`
///
/// # Arguments
///
/// * `report` - The finished sieve run
/// * `handler` - The renderer to use
/// * `path` - Destination file, if any
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to render or write
pub fn write_report(
    report: &SieveReport,
    handler: &dyn OutputHandler,
    path: Option<&Path>,
) -> OutputResult<()> {
    let rendered = handler.render(report)?;

    match path {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(rendered.as_bytes())?;
            if !rendered.ends_with('\n') {
                file.write_all(b"\n")?;
            }
            tracing::info!("Results written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", rendered)?;
        }
    }

    Ok(())
}
