//! Crawler module for hierarchical notice harvesting
//!
//! This module contains the traversal engine, including:
//! - Pagination of lot listings
//! - Batched concurrent fetching of lot details
//! - Per-node failure isolation
//! - Reassembly of the nested notice tree

mod batch;
mod controller;
mod detail;
mod outcome;
mod paginator;
mod report;

pub use batch::run_batched;
pub use controller::Crawler;
pub use detail::{fetch_lot_detail, fetch_page};
pub use outcome::{NodeError, NodeFailure, NodeLevel, Outcome};
pub use paginator::{paginate, CursorState, ListingSelectors, PageCursor};
pub use report::CrawlReport;

use crate::browser::HttpBrowser;
use crate::config::Config;
use crate::extract::PortalExtractors;
use crate::HarvestError;

/// Runs a complete crawl of the configured portal
///
/// Builds the HTTP page fetcher and the portal extractors, then walks every
/// notice. Only setup can fail; crawl failures end up in the report.
///
/// # Example
///
/// ```no_run
/// use lot_harvest::config::load_config;
/// use lot_harvest::crawler::crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let report = crawl(&config).await?;
/// println!("{} notices", report.notices.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: &Config) -> Result<CrawlReport, HarvestError> {
    let browser = HttpBrowser::new(&config.browser, &config.crawler)?;
    let extractors = PortalExtractors::portal(&config.selectors)?;
    let crawler = Crawler::new(
        browser,
        extractors,
        config.crawler.clone(),
        config.selectors.clone(),
    );

    Ok(crawler.crawl(&config.portal.notices_url()).await)
}
