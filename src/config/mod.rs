//! Configuration module for Lot-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so an empty file is a valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use lot_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Lot details fetched {} at a time", config.crawler.batch_width);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, Config, CrawlerConfig, OutputConfig, PortalConfig, SelectorConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
