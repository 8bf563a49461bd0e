//! Crawl controller - walks notices, their lots, and each lot's details
//!
//! Notices are handled one after another. For each notice:
//! 1. Its lot listing is paginated on a single page handle
//! 2. Each lot gets its detail locator
//! 3. Lot details are fetched concurrently, `batch_width` at a time
//! 4. Details are attached to lots and lots to the notice
//!
//! The notice listing page and each lot listing page are closed before the
//! detail fetches start, so at most `batch_width` pages are open at once.
//! A failure only empties the node it happened at.

use crate::browser::Browser;
use crate::config::{CrawlerConfig, SelectorConfig};
use crate::crawler::batch::run_batched;
use crate::crawler::detail::{fetch_lot_detail, fetch_page};
use crate::crawler::outcome::NodeLevel;
use crate::crawler::paginator::{paginate, ListingSelectors};
use crate::crawler::report::CrawlReport;
use crate::extract::{Extractors, FieldExtractor};
use crate::model::{Lot, LotDetailRow, Notice};
use std::num::NonZeroUsize;
use std::time::Instant;

/// Hierarchical crawler over a browser and one extractor per level
pub struct Crawler<B, N, L, D> {
    browser: B,
    extractors: Extractors<N, L, D>,
    settings: CrawlerConfig,
    selectors: SelectorConfig,
}

impl<B, N, L, D> Crawler<B, N, L, D>
where
    B: Browser,
    N: FieldExtractor<Record = Notice>,
    L: FieldExtractor<Record = Lot>,
    D: FieldExtractor<Record = LotDetailRow>,
{
    pub fn new(
        browser: B,
        extractors: Extractors<N, L, D>,
        settings: CrawlerConfig,
        selectors: SelectorConfig,
    ) -> Self {
        Self {
            browser,
            extractors,
            settings,
            selectors,
        }
    }

    /// Crawls the notice listing at `listing_url` and everything below it
    ///
    /// Never fails: node failures are recorded in the report. If the notice
    /// listing itself cannot be read, the report holds no notices.
    pub async fn crawl(&self, listing_url: &str) -> CrawlReport {
        let start = Instant::now();
        let mut report = CrawlReport::new();

        tracing::info!("Fetching notice listing: {}", listing_url);
        let notices = match fetch_page(
            &self.browser,
            listing_url,
            &self.selectors.notice_rows,
            self.settings.wait_timeout(),
            &self.extractors.notices,
        )
        .await
        {
            Ok(notices) => notices,
            Err(cause) => {
                report.record_failure(NodeLevel::NoticeListing, listing_url, 0, &cause);
                report.finish(start.elapsed());
                return report;
            }
        };

        let total = notices.len();
        tracing::info!("Found {} notices", total);

        for (index, notice) in notices.into_iter().enumerate() {
            let notice = self.crawl_notice(notice, &mut report).await;
            tracing::info!(
                "Notice {}/{} {}: {} lots",
                index + 1,
                total,
                notice.code,
                notice.lots_details.len()
            );
            report.notices.push(notice);
        }

        report.finish(start.elapsed());
        tracing::info!(
            "Crawl finished in {:?}: {} notices, {} lots, {} failures",
            report.elapsed,
            report.notices.len(),
            report.lot_count(),
            report.failures.len()
        );
        report
    }

    /// Gathers the lots of one notice, with their details, and attaches them
    async fn crawl_notice(&self, notice: Notice, report: &mut CrawlReport) -> Notice {
        let listing = ListingSelectors {
            ready: &self.selectors.lot_ready,
            next: &self.selectors.lot_next,
        };

        let (lots, cause) = paginate(
            &self.browser,
            &notice.link,
            listing,
            &self.extractors.lots,
            &self.settings,
        )
        .await
        .into_parts();

        if let Some(cause) = cause {
            report.record_failure(NodeLevel::LotListing, &notice.link, lots.len(), &cause);
        }

        let lots: Vec<Lot> = lots
            .into_iter()
            .map(|lot| lot.with_locator(&notice.link))
            .collect();
        tracing::debug!("{}: {} lots listed", notice.link, lots.len());

        let lots = self.fetch_details(&notice.link, lots, report).await;
        notice.with_lots(lots)
    }

    /// Fetches every lot's detail table in bounded batches
    async fn fetch_details(
        &self,
        notice_link: &str,
        lots: Vec<Lot>,
        report: &mut CrawlReport,
    ) -> Vec<Lot> {
        let width = NonZeroUsize::new(self.settings.batch_width).unwrap_or(NonZeroUsize::MIN);
        let ready = self.selectors.detail_ready.as_str();
        let timeout = self.settings.wait_timeout();

        let outcomes = run_batched(&lots, width, |lot| {
            fetch_lot_detail(
                &self.browser,
                &self.extractors.details,
                ready,
                timeout,
                &lot.lot,
                notice_link,
            )
        })
        .await;

        lots.into_iter()
            .zip(outcomes)
            .map(|(lot, outcome)| {
                if outcome.is_skipped() {
                    report.skipped_lots += 1;
                }

                let (rows, cause) = outcome.into_parts();
                if let Some(cause) = cause {
                    let locator = lot.link.as_deref().unwrap_or(&lot.lot);
                    report.record_failure(NodeLevel::LotDetail, locator, rows.len(), &cause);
                }
                lot.with_rows(rows)
            })
            .collect()
    }
}
