use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Lot-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub portal: PortalConfig,
    pub crawler: CrawlerConfig,
    pub selectors: SelectorConfig,
    pub browser: BrowserConfig,
    pub output: OutputConfig,
}

/// Location of the portal being harvested
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PortalConfig {
    /// Scheme and host of the portal
    pub base_url: String,

    /// Path of the notice listing, relative to `base_url`
    pub notices_path: String,
}

impl PortalConfig {
    /// Returns the absolute URL of the notice listing
    pub fn notices_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.notices_path.trim_start_matches('/')
        )
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: "http://www25.receita.fazenda.gov.br".to_string(),
            notices_path: "/sle-sociedade/portal".to_string(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum number of lot detail pages open at once
    pub batch_width: usize,

    /// How long to wait for expected content before giving up on a page (seconds)
    pub wait_timeout_secs: u64,

    /// Delay between two checks for expected content (milliseconds)
    pub poll_interval_ms: u64,

    /// Maximum number of pages visited in a single paginated listing
    pub max_listing_pages: u32,
}

impl CrawlerConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            batch_width: 100,
            wait_timeout_secs: 60,
            poll_interval_ms: 500,
            max_listing_pages: 500,
        }
    }
}

/// CSS selectors describing how the crawler recognises each listing
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SelectorConfig {
    /// Rows of the notice listing
    pub notice_rows: String,

    /// Present once a lot listing page has rendered
    pub lot_ready: String,

    /// Rows of a lot listing page
    pub lot_rows: String,

    /// The "next page" control of a lot listing
    pub lot_next: String,

    /// Present once a lot detail page has rendered
    pub detail_ready: String,

    /// Rows of a lot detail table
    pub detail_rows: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            notice_rows: "tbody tr".to_string(),
            lot_ready: "table.table.table-striped".to_string(),
            lot_rows: "tbody tr".to_string(),
            lot_next: "li.pagination-next a".to_string(),
            detail_ready: "table.table-striped".to_string(),
            detail_rows: "table.table-striped tbody tr".to_string(),
        }
    }
}

/// HTTP page fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BrowserConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Timeout of a single HTTP request (seconds)
    pub request_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("lot-harvest/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: 30,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path of the JSON document to write
    pub path: String,

    /// Write the document even when no notice was harvested
    pub write_empty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "full_notices.json".to_string(),
            write_empty: false,
        }
    }
}
