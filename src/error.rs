//! Error types for fetching and loading the news listing page.
//!
//! Only failures that stop a run live here. Problems with individual page
//! elements (missing headlines, links without `href`) are not errors; the
//! extractor simply drops those candidates. A page with nothing on it, even
//! an empty body, is not an error either.

use reqwest::StatusCode;
use thiserror::Error;

/// Failures that send a run down the error-feed path.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Transport failure: DNS, connect, timeout, or reading the body.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },

    /// A configuration value is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ScrapeError {
    /// Creates a Config error with a custom message.
    pub fn config(msg: impl Into<String>) -> Self {
        ScrapeError::Config(msg.into())
    }
}
