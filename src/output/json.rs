//! Structured JSON report

use crate::crawler::SieveReport;
use crate::output::traits::{MatchRecord, OutputHandler, OutputResult};

/// Renders matches as a pretty-printed JSON array of `MatchRecord`
#[derive(Debug, Clone)]
pub struct JsonReport {
    item_page_url: String,
}

impl JsonReport {
    pub fn new(item_page_url: &str) -> Self {
        Self {
            item_page_url: item_page_url.to_string(),
        }
    }
}

impl OutputHandler for JsonReport {
    fn render(&self, report: &SieveReport) -> OutputResult<String> {
        let records: Vec<MatchRecord> = report
            .results
            .iter()
            .map(|r| MatchRecord::from_result(r, &self.item_page_url))
            .collect();

        Ok(serde_json::to_string_pretty(&records)?)
    }
}
