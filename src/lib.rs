//! Lot-Harvest: a procurement notice harvester
//!
//! This crate walks a three-level hierarchy of remote listings (notices, their
//! paginated lots, and each lot's item table), fetching children concurrently
//! in bounded batches and assembling one nested document, while isolating
//! failures to the node where they happen.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod model;
pub mod output;

use std::time::Duration;
use thiserror::Error;

/// Main error type for Lot-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector '{selector}' for {field}")]
    InvalidSelector { field: String, selector: String },
}

/// Errors raised by a page fetcher while driving a page handle
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("Navigation to {url} failed: {source}")]
    Navigation { url: String, source: reqwest::Error },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Timed out after {timeout:?} waiting for '{selector}'")]
    Timeout { selector: String, timeout: Duration },

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Page has not been navigated yet")]
    NotNavigated,

    #[error("Pagination control on {url} has no target")]
    MissingTarget { url: String },
}

/// Errors raised by a field extractor
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid selector: {0}")]
    Selector(String),
}

/// Result type alias for Lot-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for page fetcher operations
pub type BrowserResult<T> = std::result::Result<T, BrowserError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlReport, Crawler};
pub use model::{Lot, LotDetailRow, Notice};
