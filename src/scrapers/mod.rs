//! Fetching and scraping the news listing page.
//!
//! A run has two phases here:
//!
//! 1. **Fetching**: one GET of the listing page with a fixed User-Agent
//!    ([`fetch_listing`])
//! 2. **Extracting**: turning the parsed page into article records
//!    ([`wbtv::Extractor`])
//!
//! Fetching is the only place a run can fail before the feed is assembled.
//! There are no retries; the first failure goes straight to the error feed.

pub mod wbtv;

use crate::config::FeedConfig;
use crate::error::ScrapeError;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, instrument};

/// Download the listing page body.
///
/// Non-success statuses are reported as errors so the caller can switch to
/// the error feed. An empty body is returned as-is; it simply contains no
/// articles.
#[instrument(level = "info", skip_all, fields(url = %config.site_url))]
pub async fn fetch_listing(config: &FeedConfig) -> Result<String, ScrapeError> {
    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    info!("Fetching news listing page");
    let response = client.get(&config.site_url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::Status {
            url: config.site_url.clone(),
            status,
        });
    }

    let body = response.text().await?;

    info!(bytes = body.len(), %status, "Fetched news listing page");
    Ok(body)
}
