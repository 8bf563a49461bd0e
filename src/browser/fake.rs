//! Scripted in-memory browser for unit tests
//!
//! Pages are registered by URL. The browser counts opened and closed handles
//! and the peak number of handles open at once.

use crate::browser::{Browser, NextControl, PageHandle, PageSnapshot};
use crate::{BrowserError, BrowserResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A scripted page
#[derive(Debug, Clone, Default)]
pub(crate) struct FakePage {
    /// One record per line, read back by `line_extractor`
    pub html: String,
    /// Whether waiting for content succeeds
    pub ready: bool,
    pub next: Option<NextControl>,
    /// Navigation to this page fails
    pub fail: bool,
    /// Time the navigation takes
    pub delay: Duration,
}

impl FakePage {
    pub fn rows(rows: &[&str]) -> Self {
        Self {
            html: rows.join("\n"),
            ready: true,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn next_to(mut self, url: &str) -> Self {
        self.next = Some(NextControl {
            target: Some(url.to_string()),
            disabled: false,
        });
        self
    }

    pub fn next_disabled(mut self) -> Self {
        self.next = Some(NextControl {
            target: None,
            disabled: true,
        });
        self
    }

    pub fn not_ready(mut self) -> Self {
        self.ready = false;
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Debug, Default)]
struct Inner {
    pages: Mutex<HashMap<String, FakePage>>,
    visits: Mutex<Vec<String>>,
    opened: AtomicUsize,
    closed: AtomicUsize,
    open_now: AtomicUsize,
    max_open: AtomicUsize,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeBrowser {
    inner: Arc<Inner>,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: &str, page: FakePage) -> Self {
        self.inner
            .pages
            .lock()
            .unwrap()
            .insert(url.to_string(), page);
        self
    }

    pub fn opened(&self) -> usize {
        self.inner.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.inner.closed.load(Ordering::SeqCst)
    }

    pub fn max_open(&self) -> usize {
        self.inner.max_open.load(Ordering::SeqCst)
    }

    pub fn visits(&self) -> Vec<String> {
        self.inner.visits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    type Page = FakeTab;

    async fn open_page(&self) -> BrowserResult<FakeTab> {
        self.inner.opened.fetch_add(1, Ordering::SeqCst);
        let now = self.inner.open_now.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.max_open.fetch_max(now, Ordering::SeqCst);

        Ok(FakeTab {
            inner: self.inner.clone(),
            url: String::new(),
            page: None,
        })
    }
}

#[derive(Debug)]
pub(crate) struct FakeTab {
    inner: Arc<Inner>,
    url: String,
    page: Option<FakePage>,
}

impl FakeTab {
    fn current(&self) -> BrowserResult<&FakePage> {
        self.page.as_ref().ok_or(BrowserError::NotNavigated)
    }
}

#[async_trait]
impl PageHandle for FakeTab {
    async fn goto(&mut self, url: &str) -> BrowserResult<()> {
        self.inner.visits.lock().unwrap().push(url.to_string());
        let page = self.inner.pages.lock().unwrap().get(url).cloned();

        let page = match page {
            Some(page) => page,
            None => {
                return Err(BrowserError::Status {
                    url: url.to_string(),
                    status: 404,
                })
            }
        };

        if !page.delay.is_zero() {
            tokio::time::sleep(page.delay).await;
        }

        if page.fail {
            return Err(BrowserError::Status {
                url: url.to_string(),
                status: 500,
            });
        }

        self.url = url.to_string();
        self.page = Some(page);
        Ok(())
    }

    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> BrowserResult<()> {
        if self.current()?.ready {
            Ok(())
        } else {
            Err(BrowserError::Timeout {
                selector: selector.to_string(),
                timeout,
            })
        }
    }

    async fn snapshot(&mut self) -> BrowserResult<PageSnapshot> {
        Ok(PageSnapshot {
            url: self.url.clone(),
            html: self.current()?.html.clone(),
        })
    }

    async fn find_next_control(&mut self, _selector: &str) -> BrowserResult<Option<NextControl>> {
        Ok(self.current()?.next.clone())
    }

    async fn activate(&mut self, control: &NextControl) -> BrowserResult<()> {
        match &control.target {
            Some(target) => self.goto(target).await,
            None => Err(BrowserError::MissingTarget {
                url: self.url.clone(),
            }),
        }
    }

    async fn close(self) {
        self.inner.closed.fetch_add(1, Ordering::SeqCst);
        self.inner.open_now.fetch_sub(1, Ordering::SeqCst);
    }
}
