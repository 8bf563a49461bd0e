//! Paginated listing traversal
//!
//! A listing is walked with a [`PageCursor`]:
//!
//! | State    | Action                                              | Next state        |
//! |----------|-----------------------------------------------------|-------------------|
//! | Fetching | wait for content, extract rows, look for "next"     | HasNext or Done   |
//! | HasNext  | activate "next" and wait for the navigation         | Fetching          |
//! | Done     | stop                                                | -                 |
//!
//! A missing or disabled "next" control ends the listing. The cursor refuses
//! to go past the configured page cap, so a listing whose "next" control never
//! becomes disabled ends in a `PageLimit` failure instead of looping forever.

use crate::browser::{Browser, NextControl, PageHandle};
use crate::config::CrawlerConfig;
use crate::crawler::outcome::{NodeError, Outcome};
use crate::extract::FieldExtractor;
use std::time::Duration;

/// Selectors describing one kind of paginated listing
#[derive(Debug, Clone, Copy)]
pub struct ListingSelectors<'a> {
    /// Matches once a page of the listing has rendered
    pub ready: &'a str,

    /// The "next page" control
    pub next: &'a str,
}

/// Where a listing traversal stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorState {
    /// The current page still has to be read
    Fetching,

    /// The current page was read and links to another one
    HasNext(NextControl),

    /// The listing is exhausted
    Done,
}

/// Position within a paginated listing
#[derive(Debug)]
pub struct PageCursor {
    state: CursorState,
    page: u32,
    max_pages: u32,
}

impl PageCursor {
    pub fn new(max_pages: u32) -> Self {
        Self {
            state: CursorState::Fetching,
            page: 1,
            max_pages,
        }
    }

    pub fn state(&self) -> &CursorState {
        &self.state
    }

    /// 1-based number of the current page
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Records the "next" control found on the page just read
    ///
    /// A missing or disabled control ends the listing. An enabled one on the
    /// last allowed page is a `PageLimit` failure.
    pub fn page_read(&mut self, next: Option<NextControl>) -> Result<(), NodeError> {
        match next.filter(|control| !control.disabled) {
            None => self.state = CursorState::Done,
            Some(_) if self.page >= self.max_pages => {
                self.state = CursorState::Done;
                return Err(NodeError::PageLimit {
                    limit: self.max_pages,
                });
            }
            Some(control) => self.state = CursorState::HasNext(control),
        }
        Ok(())
    }

    /// Moves to the next page, returning the control leading there
    pub fn turn_page(&mut self) -> Option<NextControl> {
        match std::mem::replace(&mut self.state, CursorState::Fetching) {
            CursorState::HasNext(control) => {
                self.page += 1;
                Some(control)
            }
            other => {
                self.state = other;
                None
            }
        }
    }
}

/// Collects the rows of every page of the listing at `url`
///
/// One page handle is used for the whole listing and closed before
/// returning, whatever happened. A failure stops the traversal and the rows
/// gathered up to that point are kept in the returned outcome.
pub async fn paginate<B, E>(
    browser: &B,
    url: &str,
    selectors: ListingSelectors<'_>,
    extractor: &E,
    settings: &CrawlerConfig,
) -> Outcome<E::Record>
where
    B: Browser,
    E: FieldExtractor,
{
    let mut page = match browser.open_page().await {
        Ok(page) => page,
        Err(e) => return Outcome::Failed(e.into()),
    };

    let mut rows = Vec::new();
    let walked = walk(
        &mut page,
        url,
        selectors,
        extractor,
        settings.wait_timeout(),
        settings.max_listing_pages,
        &mut rows,
    )
    .await;
    page.close().await;

    match walked {
        Ok(pages) => {
            tracing::debug!("Read {} rows over {} pages from {}", rows.len(), pages, url);
            Outcome::Complete(rows)
        }
        Err(cause) => Outcome::interrupted(rows, cause),
    }
}

/// Drives the cursor over the listing, appending rows as pages are read
async fn walk<P, E>(
    page: &mut P,
    url: &str,
    selectors: ListingSelectors<'_>,
    extractor: &E,
    timeout: Duration,
    max_pages: u32,
    rows: &mut Vec<E::Record>,
) -> Result<u32, NodeError>
where
    P: PageHandle,
    E: FieldExtractor,
{
    page.goto(url).await?;
    let mut cursor = PageCursor::new(max_pages);

    loop {
        match cursor.state() {
            CursorState::Fetching => {
                page.wait_for_selector(selectors.ready, timeout).await?;
                let snapshot = page.snapshot().await?;
                let found = extractor.extract(&snapshot)?;
                tracing::trace!("Page {} of {}: {} rows", cursor.page(), url, found.len());
                rows.extend(found);

                let next = page.find_next_control(selectors.next).await?;
                cursor.page_read(next)?;
            }
            CursorState::HasNext(_) => {
                if let Some(control) = cursor.turn_page() {
                    page.activate(&control).await?;
                }
            }
            CursorState::Done => return Ok(cursor.page()),
        }
    }
}
