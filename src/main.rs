//! # WBTV RSS
//!
//! Scrapes the WBTV news listing page and publishes the headlines it finds as
//! an RSS 2.0 feed.
//!
//! ## Usage
//!
//! ```sh
//! wbtv_rss -o public/feed.xml
//! ```
//!
//! ## Architecture
//!
//! One run is a straight pipeline:
//! 1. **Fetching**: GET the listing page with a fixed User-Agent
//! 2. **Extracting**: run the selector cascade over the parsed page
//! 3. **Assembling**: build the feed, with a placeholder item if nothing was found
//! 4. **Output**: overwrite the feed file
//!
//! If fetching fails, an error feed is written in place of the normal one and
//! the process still exits with failure, so a scheduler can alert on it.

use chrono::Utc;
use clap::Parser;
use scraper::Html;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cli::Cli;
use config::FeedConfig;
use error::ScrapeError;
use models::ArticleRecord;
use outputs::rss;
use scrapers::wbtv::Extractor;
use utils::{ensure_output_writable, truncate_for_log};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("wbtv_rss starting up");

    let args = Cli::parse();
    debug!(output = %args.output.display(), config = ?args.config, "Parsed CLI arguments");

    let config = FeedConfig::load(args.config.as_deref())?;

    // Early check: a bad output path fails before any request is made
    if let Err(e) = ensure_output_writable(&args.output).await {
        error!(
            path = %args.output.display(),
            error = %e,
            "Output location is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let result = run(&config, &args.output).await;

    let elapsed = start_time.elapsed();
    match &result {
        Ok(count) => info!(?elapsed, articles = count, "Execution complete"),
        Err(e) => error!(?elapsed, error = %e, "Execution failed"),
    }
    result.map(|_| ())
}

/// Generate the feed and write it to `output`.
///
/// Returns the number of extracted articles (zero when the placeholder was
/// written). When fetching fails, the error feed is written first and the
/// failure is then returned to the caller.
#[instrument(level = "info", skip_all, fields(output = %output.display()))]
async fn run(config: &FeedConfig, output: &Path) -> Result<usize, Box<dyn Error>> {
    let records = match scrape(config).await {
        Ok(records) => records,
        Err(e) => {
            error!(error = %e, "Error generating RSS feed");
            let feed = rss::build_error_feed(&e.to_string(), config, Utc::now());
            rss::write_feed(&feed, output).await?;
            return Err(e.into());
        }
    };

    let found = records.len();
    if let Some(first) = records.first() {
        debug!(first = %truncate_for_log(&first.title, 80), "First article");
    }
    let feed = rss::build_feed(records, config, Utc::now());
    rss::write_feed(&feed, output).await?;
    info!(articles = found, "RSS feed generated successfully");
    Ok(found)
}

async fn scrape(config: &FeedConfig) -> Result<Vec<ArticleRecord>, ScrapeError> {
    let extractor = Extractor::from_config(config)?;
    let body = scrapers::fetch_listing(config).await?;
    let document = Html::parse_document(&body);
    Ok(extractor.extract(&document, Utc::now()))
}
