//! Data models for scraped articles and the feed built from them.
//!
//! - [`ArticleRecord`]: one normalized article pulled off the listing page
//! - [`FeedDocument`]: the channel metadata plus its ordered items, ready to
//!   serialize
//!
//! Both are built fresh on every run and dropped after the output file is
//! written. Nothing here is persisted or merged with a previous feed.

use chrono::{DateTime, Utc};

/// A single article as it will appear in the feed.
///
/// Records that leave the extractor always have a non-empty `url` and a
/// `title` longer than ten characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    /// The headline text.
    pub title: String,
    /// Summary text, or the title again when the page had no summary.
    pub description: String,
    /// Absolute article URL.
    pub url: String,
    /// The listing page carries no dates, so this is the extraction time.
    pub published_at: DateTime<Utc>,
}

/// A complete feed: channel metadata followed by its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDocument {
    pub title: String,
    pub description: String,
    /// Where the feed itself is published (`atom:link rel="self"`).
    pub feed_url: String,
    /// The site the feed describes (channel `<link>`).
    pub site_url: String,
    pub language: String,
    /// Minutes a reader may cache the feed. `None` omits `<ttl>`.
    pub ttl: Option<u32>,
    pub generated_at: DateTime<Utc>,
    pub items: Vec<ArticleRecord>,
}

impl FeedDocument {
    /// Number of items in the channel.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> ArticleRecord {
        ArticleRecord {
            title: title.to_string(),
            description: title.to_string(),
            url: "https://www.wbtv.com/news/story-1".to_string(),
            published_at: Utc::now(),
        }
    }

    #[test]
    fn test_feed_document_item_count() {
        let feed = FeedDocument {
            title: "WBTV News Feed".to_string(),
            description: "Latest news from WBTV Charlotte".to_string(),
            feed_url: "https://example.github.io/feed.xml".to_string(),
            site_url: "https://www.wbtv.com/news/".to_string(),
            language: "en".to_string(),
            ttl: Some(60),
            generated_at: Utc::now(),
            items: vec![record("First headline here"), record("Second headline here")],
        };

        assert_eq!(feed.item_count(), 2);
    }

    #[test]
    fn test_article_record_clone_is_equal() {
        let a = record("Council approves new budget");
        assert_eq!(a.clone(), a);
    }
}
