//! Output module for persisting harvested notices
//!
//! This module handles:
//! - Assembling the nested document from a crawl report
//! - Writing the document as indented JSON
//! - Summarising crawl statistics

mod json;
pub mod stats;
mod traits;

pub use json::{to_json_string, write_json, JsonFileOutput};
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{Document, OutputError, OutputHandler, OutputResult};

use crate::crawler::CrawlReport;

/// Builds the output document from a finished crawl
///
/// The notices are taken as they are: already nested, in listing order.
pub fn assemble(report: CrawlReport) -> Document {
    Document {
        notices: report.notices,
    }
}
