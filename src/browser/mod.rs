//! Page fetcher interface
//!
//! The crawler drives pages exclusively through the [`Browser`] and
//! [`PageHandle`] traits:
//! - A browser opens page handles; each handle is owned by the operation that
//!   opened it and must be closed on every exit path
//! - A page handle navigates, waits for content, exposes a snapshot of its
//!   markup and drives the "next page" control of a listing
//!
//! [`HttpBrowser`] is the implementation used by the binary.

#[cfg(test)]
pub(crate) mod fake;
mod http;

pub use http::{build_http_client, find_next_control, HttpBrowser, HttpPage};

use crate::BrowserResult;
use async_trait::async_trait;
use std::time::Duration;

/// Markup of a page at the moment it was captured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    /// URL the markup was loaded from, after redirects
    pub url: String,

    /// Raw HTML
    pub html: String,
}

/// The "next page" control of a paginated listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextControl {
    /// Absolute URL the control leads to, if it has one
    pub target: Option<String>,

    /// Whether the control is marked disabled (equivalent to being absent)
    pub disabled: bool,
}

/// Opens page handles
#[async_trait]
pub trait Browser: Send + Sync {
    type Page: PageHandle;

    /// Acquires a fresh page handle
    async fn open_page(&self) -> BrowserResult<Self::Page>;
}

/// One exclusively owned, navigable page
#[async_trait]
pub trait PageHandle: Send {
    /// Navigates to `url` and waits for the page to settle
    async fn goto(&mut self, url: &str) -> BrowserResult<()>;

    /// Waits until `selector` matches at least one element, failing after `timeout`
    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> BrowserResult<()>;

    /// Captures the current markup
    async fn snapshot(&mut self) -> BrowserResult<PageSnapshot>;

    /// Looks up the "next page" control matched by `selector`
    async fn find_next_control(&mut self, selector: &str) -> BrowserResult<Option<NextControl>>;

    /// Activates `control` and waits for the resulting navigation to settle
    async fn activate(&mut self, control: &NextControl) -> BrowserResult<()>;

    /// Releases the page
    async fn close(self)
    where
        Self: Sized;
}
