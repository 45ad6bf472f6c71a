//! WBTV news listing extractor.
//!
//! The listing page markup changes without notice, so articles are located
//! with a cascade of selector patterns ordered from most to least specific:
//!
//! | Priority | Pattern | Matches |
//! |----------|---------|---------|
//! | 1 | `article` | semantic article containers |
//! | 2-4 | `.story-item`, `.article-item`, `.news-item` | named item classes |
//! | 5-6 | `[class*="story"]`, `[class*="article"]` | class substrings |
//! | 7 | `h2 a, h3 a, h4 a` | headline links |
//!
//! The first pattern that yields at least one valid record wins and the rest
//! are never consulted. If none does, every link whose path contains
//! `/news/`, `/story/` or `/article/` is treated as a headline.
//!
//! A record is valid when it has a link and its title is longer than ten
//! characters. Anything else is dropped silently.

use crate::config::FeedConfig;
use crate::error::ScrapeError;
use crate::models::ArticleRecord;
use crate::utils::truncate_for_log;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};

/// Titles must be longer than this many characters.
const MIN_TITLE_CHARS: usize = 10;

/// One rung of the cascade.
struct Strategy {
    pattern: &'static str,
    selector: Selector,
}

static CASCADE: Lazy<Vec<Strategy>> = Lazy::new(|| {
    [
        "article",
        ".story-item",
        ".article-item",
        ".news-item",
        r#"[class*="story"]"#,
        r#"[class*="article"]"#,
        "h2 a, h3 a, h4 a",
    ]
    .into_iter()
    .map(|pattern| Strategy {
        pattern,
        selector: selector(pattern),
    })
    .collect()
});

static FALLBACK_LINKS: Lazy<Selector> = Lazy::new(|| {
    selector(r#"a[href*="/news/"], a[href*="/story/"], a[href*="/article/"]"#)
});

// Lookups inside a matched container. Groups are tried in order; within a
// group the first element in document order wins.
static TITLE_LOOKUP: Lazy<Vec<Selector>> = Lazy::new(|| {
    ["h1, h2, h3, h4, h5, h6", ".headline, .title", "a[href]"]
        .into_iter()
        .map(selector)
        .collect()
});

static SUMMARY_LOOKUP: Lazy<Vec<Selector>> = Lazy::new(|| {
    ["p", ".summary", ".excerpt", ".description"]
        .into_iter()
        .map(selector)
        .collect()
});

static ANY_LINK: Lazy<Selector> = Lazy::new(|| selector("a"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e:?}"))
}

/// How a matched node yields its headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    /// The node is the link: its text is the title, its `href` the URL.
    Link,
    /// The node wraps the article: title, link and summary are searched for
    /// inside it.
    Container,
}

impl NodeKind {
    fn of(element: &ElementRef<'_>) -> Self {
        if element.value().name() == "a" {
            NodeKind::Link
        } else {
            NodeKind::Container
        }
    }
}

/// An article before the validity gate.
#[derive(Debug, Default)]
struct Candidate {
    title: String,
    link: Option<String>,
    description: Option<String>,
}

impl Candidate {
    /// Normalize a node matched by a cascade pattern.
    fn from_node(element: ElementRef<'_>) -> Self {
        let (title, link) = match NodeKind::of(&element) {
            NodeKind::Link => (text_of(element), href_of(element)),
            NodeKind::Container => {
                let headline = first_of_groups(element, &TITLE_LOOKUP);
                let title = headline.map(text_of).unwrap_or_default();
                let link = headline
                    .and_then(href_of)
                    .or_else(|| first_descendant(element, &ANY_LINK).and_then(href_of));
                (title, link)
            }
        };

        let description = first_of_groups(element, &SUMMARY_LOOKUP)
            .map(text_of)
            .filter(|text| !text.is_empty());

        Self {
            title,
            link,
            description,
        }
    }

    /// A bare link from the fallback scan. No summary lookup is done.
    fn from_link(element: ElementRef<'_>) -> Self {
        Self {
            title: text_of(element),
            link: href_of(element),
            description: None,
        }
    }

    fn into_record(self, origin: &str, published_at: DateTime<Utc>) -> Option<ArticleRecord> {
        let Candidate {
            title,
            link,
            description,
        } = self;

        let url = absolutize(&link?, origin);
        if url.is_empty() || !is_headline(&title) {
            return None;
        }

        let description = description.unwrap_or_else(|| title.clone());
        Some(ArticleRecord {
            title,
            description,
            url,
            published_at,
        })
    }
}

/// Turns a parsed listing page into article records.
#[derive(Debug, Clone)]
pub struct Extractor {
    origin: String,
    max_articles: usize,
}

impl Extractor {
    /// `origin` is the scheme and host prefixed to root-relative links.
    pub fn new(origin: impl Into<String>, max_articles: usize) -> Self {
        Self {
            origin: origin.into(),
            max_articles,
        }
    }

    pub fn from_config(config: &FeedConfig) -> Result<Self, ScrapeError> {
        Ok(Self::new(config.origin()?, config.max_articles))
    }

    /// Run the cascade, then the link fallback if the cascade found nothing.
    ///
    /// Every record gets `published_at`; the page carries no per-article
    /// dates. An empty result is a normal outcome, not an error.
    #[instrument(level = "info", skip_all, fields(origin = %self.origin))]
    pub fn extract(&self, document: &Html, published_at: DateTime<Utc>) -> Vec<ArticleRecord> {
        for strategy in CASCADE.iter() {
            let matched: Vec<ElementRef<'_>> = document.select(&strategy.selector).collect();
            if matched.is_empty() {
                continue;
            }
            info!(
                pattern = strategy.pattern,
                elements = matched.len(),
                "Found elements with selector"
            );

            let records = self.collect(
                matched.into_iter().map(Candidate::from_node),
                published_at,
            );
            if !records.is_empty() {
                info!(pattern = strategy.pattern, count = records.len(), "Extracted articles");
                return records;
            }
            debug!(pattern = strategy.pattern, "No valid articles for selector");
        }

        info!("No articles found with common selectors, trying general approach");
        let records = self.collect(
            document.select(&FALLBACK_LINKS).map(Candidate::from_link),
            published_at,
        );
        info!(count = records.len(), "Extracted articles from links");
        records
    }

    /// Keep valid candidates in discovery order until the cap is reached.
    fn collect(
        &self,
        candidates: impl Iterator<Item = Candidate>,
        published_at: DateTime<Utc>,
    ) -> Vec<ArticleRecord> {
        let mut records = Vec::new();
        for candidate in candidates {
            if records.len() >= self.max_articles {
                break;
            }
            if let Some(record) = candidate.into_record(&self.origin, published_at) {
                debug!(title = %truncate_for_log(&record.title, 80), url = %record.url, "Accepted article");
                records.push(record);
            }
        }
        records
    }
}

/// Prefix root-relative links with `origin`; leave everything else alone.
pub fn absolutize(link: &str, origin: &str) -> String {
    if link.starts_with('/') {
        format!("{origin}{link}")
    } else {
        link.to_string()
    }
}

fn is_headline(title: &str) -> bool {
    !title.is_empty() && title.chars().count() > MIN_TITLE_CHARS
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn href_of(element: ElementRef<'_>) -> Option<String> {
    element
        .value()
        .attr("href")
        .filter(|href| !href.is_empty())
        .map(str::to_string)
}

/// First descendant matching `selector`, excluding `scope` itself.
fn first_descendant<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).find(|el| el.id() != scope.id())
}

fn first_of_groups<'a>(scope: ElementRef<'a>, groups: &[Selector]) -> Option<ElementRef<'a>> {
    groups.iter().find_map(|group| first_descendant(scope, group))
}
