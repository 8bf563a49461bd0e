//! Single-page fetches: the notice listing and each lot's detail table

use crate::browser::{Browser, PageHandle};
use crate::crawler::outcome::{NodeError, Outcome};
use crate::extract::FieldExtractor;
use crate::model::lot_detail_url;
use std::time::Duration;

/// Opens `url` on a fresh page, waits for `ready`, and extracts its rows
///
/// The page is closed before returning, on success and on failure alike.
pub async fn fetch_page<B, E>(
    browser: &B,
    url: &str,
    ready: &str,
    timeout: Duration,
    extractor: &E,
) -> Result<Vec<E::Record>, NodeError>
where
    B: Browser,
    E: FieldExtractor,
{
    let mut page = browser.open_page().await?;
    let rows = read_page(&mut page, url, ready, timeout, extractor).await;
    page.close().await;
    rows
}

async fn read_page<P, E>(
    page: &mut P,
    url: &str,
    ready: &str,
    timeout: Duration,
    extractor: &E,
) -> Result<Vec<E::Record>, NodeError>
where
    P: PageHandle,
    E: FieldExtractor,
{
    page.goto(url).await?;
    page.wait_for_selector(ready, timeout).await?;
    let snapshot = page.snapshot().await?;
    Ok(extractor.extract(&snapshot)?)
}

/// Fetches the detail table of one lot
///
/// The detail page lives at `<base_url>/lote/<number>`. When `lot_id` is
/// blank or carries no number there is nothing to fetch: the lot is skipped
/// without opening a page. Failures never propagate; they come back as
/// [`Outcome::Failed`] with no rows.
pub async fn fetch_lot_detail<B, E>(
    browser: &B,
    extractor: &E,
    ready: &str,
    timeout: Duration,
    lot_id: &str,
    base_url: &str,
) -> Outcome<E::Record>
where
    B: Browser,
    E: FieldExtractor,
{
    let Some(url) = lot_detail_url(base_url, lot_id) else {
        tracing::debug!("Lot '{}' under {} has no detail page", lot_id, base_url);
        return Outcome::Skipped;
    };

    match fetch_page(browser, &url, ready, timeout, extractor).await {
        Ok(rows) => {
            tracing::trace!("{}: {} detail rows", url, rows.len());
            Outcome::Complete(rows)
        }
        Err(cause) => Outcome::Failed(cause),
    }
}
