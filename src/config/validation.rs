use crate::config::types::{
    BrowserConfig, Config, CrawlerConfig, OutputConfig, PortalConfig, SelectorConfig,
};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_portal_config(&config.portal)?;
    validate_crawler_config(&config.crawler)?;
    validate_selector_config(&config.selectors)?;
    validate_browser_config(&config.browser)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the portal location
fn validate_portal_config(config: &PortalConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base_url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    Url::parse(&config.notices_url())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid notices_path: {}", e)))?;

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.batch_width < 1 || config.batch_width > 1000 {
        return Err(ConfigError::Validation(format!(
            "batch_width must be between 1 and 1000, got {}",
            config.batch_width
        )));
    }

    if config.wait_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "wait_timeout_secs must be >= 1, got {}",
            config.wait_timeout_secs
        )));
    }

    if config.poll_interval_ms < 10 {
        return Err(ConfigError::Validation(format!(
            "poll_interval_ms must be >= 10ms, got {}ms",
            config.poll_interval_ms
        )));
    }

    if config.max_listing_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_listing_pages must be >= 1, got {}",
            config.max_listing_pages
        )));
    }

    Ok(())
}

/// Validates that every selector is non-empty and parses as CSS
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    for (field, selector) in [
        ("notice_rows", &config.notice_rows),
        ("lot_ready", &config.lot_ready),
        ("lot_rows", &config.lot_rows),
        ("lot_next", &config.lot_next),
        ("detail_ready", &config.detail_ready),
        ("detail_rows", &config.detail_rows),
    ] {
        if selector.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "{} cannot be empty",
                field
            )));
        }

        if Selector::parse(selector).is_err() {
            return Err(ConfigError::InvalidSelector {
                field: field.to_string(),
                selector: selector.clone(),
            });
        }
    }

    Ok(())
}

/// Validates HTTP fetcher configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation("path cannot be empty".to_string()));
    }

    Ok(())
}
