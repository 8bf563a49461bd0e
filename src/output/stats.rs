//! Crawl statistics
//!
//! Summarises a crawl report for display at the end of a run.

use crate::crawler::{CrawlReport, NodeLevel};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub elapsed: Duration,

    /// Notices harvested
    pub notices: usize,

    /// Notices that ended up with no lots
    pub notices_without_lots: usize,

    /// Lots across all notices
    pub lots: usize,

    /// Detail rows across all lots
    pub detail_rows: usize,

    /// Lots without a detail page to visit
    pub skipped_lots: usize,

    /// Failure count per hierarchy level
    pub failures_by_level: BTreeMap<NodeLevel, usize>,
}

impl CrawlStatistics {
    /// Computes statistics from a finished crawl
    pub fn from_report(report: &CrawlReport) -> Self {
        let mut failures_by_level = BTreeMap::new();
        for failure in &report.failures {
            *failures_by_level.entry(failure.level).or_insert(0) += 1;
        }

        Self {
            started_at: report.started_at,
            finished_at: report.finished_at,
            elapsed: report.elapsed,
            notices: report.notices.len(),
            notices_without_lots: report
                .notices
                .iter()
                .filter(|n| n.lots_details.is_empty())
                .count(),
            lots: report.lot_count(),
            detail_rows: report.detail_row_count(),
            skipped_lots: report.skipped_lots,
            failures_by_level,
        }
    }

    pub fn total_failures(&self) -> usize {
        self.failures_by_level.values().sum()
    }

    /// Share of lots whose details were fetched without failure
    pub fn detail_success_rate(&self) -> f64 {
        let failed = self
            .failures_by_level
            .get(&NodeLevel::LotDetail)
            .copied()
            .unwrap_or(0);
        let attempted = self.lots.saturating_sub(self.skipped_lots);

        if attempted > 0 {
            (attempted.saturating_sub(failed) as f64 / attempted as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Harvest Statistics ===\n");

    println!("Run:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    println!("  Total runtime: {:.1}s", stats.elapsed.as_secs_f64());
    println!();

    println!("Overview:");
    println!("  Notices: {}", stats.notices);
    println!("  Notices without lots: {}", stats.notices_without_lots);
    println!("  Lots: {}", stats.lots);
    println!("  Lots without detail page: {}", stats.skipped_lots);
    println!("  Detail rows: {}", stats.detail_rows);
    println!();

    if !stats.failures_by_level.is_empty() {
        println!("Failures:");
        for (level, count) in &stats.failures_by_level {
            println!("  {}: {}", level, count);
        }
        println!();
    }

    println!(
        "Detail Success Rate: {:.1}% ({} failures in total)",
        stats.detail_success_rate(),
        stats.total_failures()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::NodeError;
    use crate::model::{Lot, LotDetailRow, Notice};
    use crate::BrowserError;

    fn report() -> CrawlReport {
        let mut report = CrawlReport::new();
        let detailed = Lot::default().with_rows(vec![LotDetailRow::default(); 3]);
        report.notices = vec![
            Notice::default().with_lots(vec![detailed, Lot::default(), Lot::default(), Lot::default()]),
            Notice::default(),
        ];
        report.skipped_lots = 2;

        let cause = NodeError::Browser(BrowserError::Status {
            url: "http://portal.test/e1/lote/3".to_string(),
            status: 500,
        });
        report.record_failure(NodeLevel::LotDetail, "http://portal.test/e1/lote/3", 0, &cause);
        report.record_failure(NodeLevel::LotListing, "http://portal.test/e2", 0, &cause);
        report
    }

    #[test]
    fn test_from_report() {
        let stats = CrawlStatistics::from_report(&report());

        assert_eq!(stats.notices, 2);
        assert_eq!(stats.notices_without_lots, 1);
        assert_eq!(stats.lots, 4);
        assert_eq!(stats.detail_rows, 3);
        assert_eq!(stats.skipped_lots, 2);
        assert_eq!(stats.total_failures(), 2);
        assert_eq!(stats.failures_by_level[&NodeLevel::LotListing], 1);
    }

    #[test]
    fn test_detail_success_rate() {
        let stats = CrawlStatistics::from_report(&report());
        // 4 lots, 2 skipped, 1 of the remaining 2 failed
        assert!((stats.detail_success_rate() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_report() {
        let stats = CrawlStatistics::from_report(&CrawlReport::new());
        assert_eq!(stats.notices, 0);
        assert_eq!(stats.total_failures(), 0);
        assert_eq!(stats.detail_success_rate(), 0.0);
    }
}
