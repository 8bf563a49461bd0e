//! Lot-Harvest main entry point
//!
//! This is the command-line interface for the Lot-Harvest notice harvester.

use anyhow::Context;
use clap::Parser;
use lot_harvest::config::{load_config_with_hash, validate, Config};
use lot_harvest::crawler::crawl;
use lot_harvest::output::{assemble, print_statistics, CrawlStatistics, JsonFileOutput, OutputHandler};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Lot-Harvest: a procurement notice harvester
///
/// Lot-Harvest reads the notice listing of a procurement portal, walks the
/// paginated lots of every notice and the item table of every lot, and writes
/// the result as one nested JSON document.
#[derive(Parser, Debug)]
#[command(name = "lot-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A procurement notice harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Write the JSON document here instead of the configured path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Number of lot detail pages fetched at once
    #[arg(long, value_name = "N")]
    batch_width: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = load(cli.config.as_ref())?;

    if let Some(output) = &cli.output {
        config.output.path = output.display().to_string();
    }
    if let Some(width) = cli.batch_width {
        config.crawler.batch_width = width;
    }
    validate(&config).context("Invalid command-line override")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("lot_harvest=info,warn"),
            1 => EnvFilter::new("lot_harvest=debug,info"),
            2 => EnvFilter::new("lot_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, or the built-in defaults
fn load(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Ok(Config::default())
        }
    }
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Lot-Harvest Dry Run ===\n");

    println!("Portal:");
    println!("  Notice listing: {}", config.portal.notices_url());

    println!("\nCrawler Configuration:");
    println!("  Batch width: {}", config.crawler.batch_width);
    println!("  Wait timeout: {}s", config.crawler.wait_timeout_secs);
    println!("  Poll interval: {}ms", config.crawler.poll_interval_ms);
    println!("  Max listing pages: {}", config.crawler.max_listing_pages);

    println!("\nSelectors:");
    println!("  Notice rows: {}", config.selectors.notice_rows);
    println!("  Lot listing ready: {}", config.selectors.lot_ready);
    println!("  Lot rows: {}", config.selectors.lot_rows);
    println!("  Lot next page: {}", config.selectors.lot_next);
    println!("  Lot detail ready: {}", config.selectors.detail_ready);
    println!("  Lot detail rows: {}", config.selectors.detail_rows);

    println!("\nBrowser:");
    println!("  User agent: {}", config.browser.user_agent);
    println!("  Request timeout: {}s", config.browser.request_timeout_secs);

    println!("\nOutput:");
    println!("  Path: {}", config.output.path);
    println!("  Write when empty: {}", config.output.write_empty);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let start = Instant::now();
    tracing::info!("Starting crawl of {}", config.portal.notices_url());

    let report = crawl(&config).await.context("Failed to start the crawl")?;

    let stats = CrawlStatistics::from_report(&report);
    print_statistics(&stats);

    let document = assemble(report);
    if document.is_empty() && !config.output.write_empty {
        tracing::warn!("No notices harvested, nothing written");
    } else {
        let output = JsonFileOutput::new(&config.output.path);
        output
            .write(&document)
            .with_context(|| format!("Failed to write {}", config.output.path))?;
    }

    tracing::info!("Total runtime: {:.1}s", start.elapsed().as_secs_f64());
    Ok(())
}
