//! HTTP page fetcher
//!
//! Implements the page interface on top of plain HTTP requests:
//! - Navigation is a GET request whose body becomes the page markup
//! - Waiting for a selector re-fetches the current URL until the selector
//!   matches or the timeout elapses
//! - The "next page" control is followed through its `href`

use crate::browser::{Browser, NextControl, PageHandle, PageSnapshot};
use crate::config::{BrowserConfig, CrawlerConfig};
use crate::{BrowserError, BrowserResult};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use lot_harvest::config::BrowserConfig;
/// use lot_harvest::browser::build_http_client;
///
/// let client = build_http_client(&BrowserConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &BrowserConfig) -> BrowserResult<Client> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(BrowserError::Client)
}

/// Browser backed by a shared HTTP client
#[derive(Debug, Clone)]
pub struct HttpBrowser {
    client: Client,
    poll_interval: Duration,
}

impl HttpBrowser {
    /// Creates a browser from the fetcher and crawler configuration
    pub fn new(browser: &BrowserConfig, crawler: &CrawlerConfig) -> BrowserResult<Self> {
        Ok(Self::with_client(
            build_http_client(browser)?,
            crawler.poll_interval(),
        ))
    }

    /// Creates a browser around an existing client
    pub fn with_client(client: Client, poll_interval: Duration) -> Self {
        Self {
            client,
            poll_interval,
        }
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    type Page = HttpPage;

    async fn open_page(&self) -> BrowserResult<HttpPage> {
        Ok(HttpPage {
            client: self.client.clone(),
            poll_interval: self.poll_interval,
            loaded: None,
        })
    }
}

/// Markup loaded by the last navigation
#[derive(Debug)]
struct Loaded {
    url: Url,
    html: String,
}

/// A page handle holding the last document it navigated to
#[derive(Debug)]
pub struct HttpPage {
    client: Client,
    poll_interval: Duration,
    loaded: Option<Loaded>,
}

impl HttpPage {
    /// Fetches `url` and replaces the current document with the response body
    async fn load(&mut self, url: Url) -> BrowserResult<()> {
        tracing::trace!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| BrowserError::Navigation {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BrowserError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let html = response
            .text()
            .await
            .map_err(|source| BrowserError::Navigation {
                url: url.to_string(),
                source,
            })?;

        self.loaded = Some(Loaded {
            url: final_url,
            html,
        });
        Ok(())
    }

    fn current(&self) -> BrowserResult<&Loaded> {
        self.loaded.as_ref().ok_or(BrowserError::NotNavigated)
    }

    /// Returns whether `selector` matches anything in the current document
    fn matches(&self, selector: &str) -> BrowserResult<bool> {
        let selector = parse_selector(selector)?;
        let document = Html::parse_document(&self.current()?.html);
        let found = document.select(&selector).next().is_some();
        Ok(found)
    }
}

#[async_trait]
impl PageHandle for HttpPage {
    async fn goto(&mut self, url: &str) -> BrowserResult<()> {
        let url = parse_url(url)?;
        self.load(url).await
    }

    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> BrowserResult<()> {
        let url = self.current()?.url.clone();
        let poll_interval = self.poll_interval;

        let waiting = async {
            loop {
                if self.matches(selector)? {
                    return Ok::<(), BrowserError>(());
                }
                tokio::time::sleep(poll_interval).await;
                self.load(url.clone()).await?;
            }
        };

        match tokio::time::timeout(timeout, waiting).await {
            Ok(result) => result,
            Err(_) => Err(BrowserError::Timeout {
                selector: selector.to_string(),
                timeout,
            }),
        }
    }

    async fn snapshot(&mut self) -> BrowserResult<PageSnapshot> {
        let loaded = self.current()?;
        Ok(PageSnapshot {
            url: loaded.url.to_string(),
            html: loaded.html.clone(),
        })
    }

    async fn find_next_control(&mut self, selector: &str) -> BrowserResult<Option<NextControl>> {
        let loaded = self.current()?;
        find_next_control(&loaded.html, &loaded.url, selector)
    }

    async fn activate(&mut self, control: &NextControl) -> BrowserResult<()> {
        let target = match &control.target {
            Some(target) => parse_url(target)?,
            None => {
                return Err(BrowserError::MissingTarget {
                    url: self.current()?.url.to_string(),
                })
            }
        };
        self.load(target).await
    }

    async fn close(self) {
        if let Some(loaded) = &self.loaded {
            tracing::trace!("Closing page at {}", loaded.url);
        }
    }
}

/// Finds the "next page" control in `html`
///
/// The control counts as disabled when it, or one of its ancestors, carries
/// the `disabled` class (pagination widgets mark the enclosing `<li>`), or when
/// it has a `disabled` or `aria-disabled="true"` attribute. Its `href` is
/// resolved against `base_url`.
pub fn find_next_control(
    html: &str,
    base_url: &Url,
    selector: &str,
) -> BrowserResult<Option<NextControl>> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(html);

    let Some(element) = document.select(&selector).next() else {
        return Ok(None);
    };

    let disabled = is_disabled(&element)
        || element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| has_class(&ancestor, "disabled"));

    let target = element
        .value()
        .attr("href")
        .map(str::trim)
        .filter(|href| !href.is_empty() && !href.starts_with('#') && !href.starts_with("javascript:"))
        .and_then(|href| base_url.join(href).ok())
        .map(String::from);

    Ok(Some(NextControl { target, disabled }))
}

fn is_disabled(element: &ElementRef) -> bool {
    let value = element.value();
    has_class(element, "disabled")
        || value.attr("disabled").is_some()
        || value.attr("aria-disabled") == Some("true")
}

fn has_class(element: &ElementRef, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

fn parse_selector(selector: &str) -> BrowserResult<Selector> {
    Selector::parse(selector).map_err(|_| BrowserError::InvalidSelector(selector.to_string()))
}

fn parse_url(url: &str) -> BrowserResult<Url> {
    Url::parse(url).map_err(|e| BrowserError::InvalidUrl {
        url: url.to_string(),
        message: e.to_string(),
    })
}
