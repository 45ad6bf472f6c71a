//! Feed configuration.
//!
//! Every value has a built-in default matching the WBTV listing page, so the
//! program runs with no configuration at all. A YAML file may override any
//! subset of the keys:
//!
//! ```yaml
//! title: WBTV News Feed
//! feed_url: https://example.github.io/wbtv-rss-feed/feed.xml
//! ttl: 30
//! ```

use crate::error::ScrapeError;
use serde::Deserialize;
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument};
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Channel metadata and fetch settings for one run.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeedConfig {
    /// Channel title.
    pub title: String,
    /// Channel description.
    pub description: String,
    /// Public URL of the generated feed file.
    pub feed_url: String,
    /// The news listing page. It is fetched, linked as the channel site, and
    /// used as the link of placeholder and error items.
    pub site_url: String,
    /// Language tag for the channel.
    pub language: String,
    /// Cache lifetime in minutes.
    pub ttl: u32,
    /// User-Agent header sent with the listing request.
    pub user_agent: String,
    /// Transport timeout for the listing request.
    pub timeout_secs: u64,
    /// Maximum number of articles kept, in discovery order.
    pub max_articles: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            title: "WBTV News Feed".to_string(),
            description: "Latest news from WBTV Charlotte".to_string(),
            feed_url: "https://rajkboddu.github.io/wbtv-rss-feed/feed.xml".to_string(),
            site_url: "https://www.wbtv.com/news/".to_string(),
            language: "en".to_string(),
            ttl: 60,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            max_articles: 20,
        }
    }
}

impl FeedConfig {
    /// Load configuration from an optional YAML file.
    ///
    /// Without a path the defaults are returned. Keys missing from the file
    /// keep their defaults.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                let config = Self::from_yaml(&raw)?;
                info!(path = %path.display(), "Loaded configuration");
                config
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes to unit, not a map.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Scheme and host of `site_url`, used to absolutize root-relative links.
    ///
    /// `https://www.wbtv.com/news/` yields `https://www.wbtv.com`.
    pub fn origin(&self) -> Result<String, ScrapeError> {
        let url = Url::parse(&self.site_url)
            .map_err(|e| ScrapeError::config(format!("site_url {:?}: {e}", self.site_url)))?;
        let origin = url.origin();
        if !origin.is_tuple() {
            return Err(ScrapeError::config(format!(
                "site_url {:?} has no host",
                self.site_url
            )));
        }
        Ok(origin.ascii_serialization())
    }

    fn validate(&self) -> Result<(), ScrapeError> {
        if self.max_articles == 0 {
            return Err(ScrapeError::config("max_articles must be at least 1"));
        }
        self.origin()?;
        Ok(())
    }
}
