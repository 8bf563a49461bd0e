//! Crawl results and the failure ledger

use crate::crawler::outcome::{NodeError, NodeFailure, NodeLevel};
use crate::model::Notice;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Everything a crawl produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Fully nested notices, in listing order
    pub notices: Vec<Notice>,

    /// Nodes whose children could not be fully fetched
    pub failures: Vec<NodeFailure>,

    /// Lots without a detail page to visit
    pub skipped_lots: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub elapsed: Duration,
}

impl CrawlReport {
    pub fn new() -> Self {
        Self {
            notices: Vec::new(),
            failures: Vec::new(),
            skipped_lots: 0,
            started_at: Utc::now(),
            finished_at: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Records a node failure and logs its cause
    pub fn record_failure(
        &mut self,
        level: NodeLevel,
        locator: &str,
        kept: usize,
        cause: &NodeError,
    ) {
        if level == NodeLevel::NoticeListing {
            tracing::error!("Error accessing {}: {}", locator, cause);
        } else if kept > 0 {
            tracing::warn!(
                "Error accessing {} {} (keeping {} rows): {}",
                level,
                locator,
                kept,
                cause
            );
        } else {
            tracing::warn!("Error accessing {} {}: {}", level, locator, cause);
        }

        self.failures
            .push(NodeFailure::new(level, locator, kept, cause));
    }

    /// Marks the crawl as finished
    pub fn finish(&mut self, elapsed: Duration) {
        self.finished_at = Some(Utc::now());
        self.elapsed = elapsed;
    }

    /// Total number of lots across all notices
    pub fn lot_count(&self) -> usize {
        self.notices.iter().map(|n| n.lots_details.len()).sum()
    }

    /// Total number of detail rows across all lots
    pub fn detail_row_count(&self) -> usize {
        self.notices
            .iter()
            .flat_map(|n| &n.lots_details)
            .map(|lot| lot.lot_table.len())
            .sum()
    }

    /// Number of failures recorded at `level`
    pub fn failures_at(&self, level: NodeLevel) -> usize {
        self.failures.iter().filter(|f| f.level == level).count()
    }
}

impl Default for CrawlReport {
    fn default() -> Self {
        Self::new()
    }
}
