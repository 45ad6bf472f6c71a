//! RSS 2.0 feed assembly and serialization.
//!
//! A written feed is always one of three shapes:
//!
//! - the extracted articles, in discovery order
//! - a single "No articles found" placeholder when extraction came back empty
//! - a single error item when the fetch failed (see [`build_error_feed`])
//!
//! Channel metadata comes from [`FeedConfig`], never from the scraped page.

use crate::config::FeedConfig;
use crate::models::{ArticleRecord, FeedDocument};
use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::error::Error;
use std::io::Write;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

pub const PLACEHOLDER_TITLE: &str = "No articles found";
pub const PLACEHOLDER_DESCRIPTION: &str =
    "The scraper could not find any articles. The website structure may have changed.";
pub const ERROR_ITEM_TITLE: &str = "Error generating feed";

const GENERATOR: &str = concat!("wbtv_rss ", env!("CARGO_PKG_VERSION"));
const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// Build the normal feed from extracted articles.
///
/// An empty `records` gets the placeholder item linking back to the listing
/// page. Otherwise every record is kept as-is, in order.
pub fn build_feed(
    records: Vec<ArticleRecord>,
    config: &FeedConfig,
    now: DateTime<Utc>,
) -> FeedDocument {
    let items = if records.is_empty() {
        vec![ArticleRecord {
            title: PLACEHOLDER_TITLE.to_string(),
            description: PLACEHOLDER_DESCRIPTION.to_string(),
            url: config.site_url.clone(),
            published_at: now,
        }]
    } else {
        records
    };

    FeedDocument {
        title: config.title.clone(),
        description: config.description.clone(),
        feed_url: config.feed_url.clone(),
        site_url: config.site_url.clone(),
        language: config.language.clone(),
        ttl: Some(config.ttl),
        generated_at: now,
        items,
    }
}

/// Build the feed written when the run failed before assembly.
///
/// It carries exactly one item whose description embeds `message`.
pub fn build_error_feed(message: &str, config: &FeedConfig, now: DateTime<Utc>) -> FeedDocument {
    FeedDocument {
        title: format!("{} - Error", config.title),
        description: "Error occurred while generating feed".to_string(),
        feed_url: config.feed_url.clone(),
        site_url: config.site_url.clone(),
        language: config.language.clone(),
        ttl: None,
        generated_at: now,
        items: vec![ArticleRecord {
            title: ERROR_ITEM_TITLE.to_string(),
            description: format!("An error occurred: {message}"),
            url: config.site_url.clone(),
            published_at: now,
        }],
    }
}

fn write_text_element<W: Write>(
    w: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), Box<dyn Error>> {
    w.write_event(Event::Start(BytesStart::new(name)))?;
    w.write_event(Event::Text(BytesText::new(&sanitize_text(text))))?;
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

// Drop control characters XML 1.0 does not allow. Tab, LF and CR survive.
fn sanitize_text(input: &str) -> String {
    input
        .chars()
        .filter(|&c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

fn write_item<W: Write>(w: &mut Writer<W>, item: &ArticleRecord) -> Result<(), Box<dyn Error>> {
    w.write_event(Event::Start(BytesStart::new("item")))?;
    write_text_element(w, "title", &item.title)?;
    write_text_element(w, "description", &item.description)?;
    write_text_element(w, "link", &item.url)?;

    let mut guid = BytesStart::new("guid");
    guid.push_attribute(("isPermaLink", "true"));
    w.write_event(Event::Start(guid))?;
    w.write_event(Event::Text(BytesText::new(&sanitize_text(&item.url))))?;
    w.write_event(Event::End(BytesEnd::new("guid")))?;

    write_text_element(w, "pubDate", &item.published_at.to_rfc2822())?;
    w.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

/// Render a feed as an RSS 2.0 document.
pub fn to_xml(feed: &FeedDocument) -> Result<String, Box<dyn Error>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    rss.push_attribute(("xmlns:atom", ATOM_NS));
    writer.write_event(Event::Start(rss))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    write_text_element(&mut writer, "title", &feed.title)?;
    write_text_element(&mut writer, "description", &feed.description)?;
    write_text_element(&mut writer, "link", &feed.site_url)?;

    let mut self_link = BytesStart::new("atom:link");
    self_link.push_attribute(("href", feed.feed_url.as_str()));
    self_link.push_attribute(("rel", "self"));
    self_link.push_attribute(("type", "application/rss+xml"));
    writer.write_event(Event::Empty(self_link))?;

    let generated = feed.generated_at.to_rfc2822();
    write_text_element(&mut writer, "generator", GENERATOR)?;
    write_text_element(&mut writer, "lastBuildDate", &generated)?;
    write_text_element(&mut writer, "pubDate", &generated)?;
    write_text_element(&mut writer, "language", &feed.language)?;
    if let Some(ttl) = feed.ttl {
        write_text_element(&mut writer, "ttl", &ttl.to_string())?;
    }

    for item in &feed.items {
        write_item(&mut writer, item)?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    let mut xml = String::from_utf8(writer.into_inner())?;
    xml.push('\n');
    Ok(xml)
}

/// Serialize `feed` and overwrite `path` with it.
#[instrument(level = "info", skip_all, fields(path = %path.display(), items = feed.item_count()))]
pub async fn write_feed(feed: &FeedDocument, path: &Path) -> Result<(), Box<dyn Error>> {
    let xml = to_xml(feed)?;
    fs::write(path, xml).await?;
    info!("Wrote RSS feed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: usize) -> ArticleRecord {
        ArticleRecord {
            title: format!("Local headline number {n}"),
            description: format!("Summary for story {n}"),
            url: format!("https://www.wbtv.com/news/story-{n}"),
            published_at: Utc::now(),
        }
    }

    #[test]
    fn test_build_feed_keeps_records_in_order() {
        let config = FeedConfig::default();
        let feed = build_feed(vec![record(1), record(2), record(3)], &config, Utc::now());

        let titles: Vec<&str> = feed.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Local headline number 1",
                "Local headline number 2",
                "Local headline number 3"
            ]
        );
        assert_eq!(feed.items[2].url, "https://www.wbtv.com/news/story-3");
        assert_eq!(feed.title, "WBTV News Feed");
        assert_eq!(feed.ttl, Some(60));
    }

    #[test]
    fn test_build_feed_placeholder_when_empty() {
        let config = FeedConfig::default();
        let now = Utc::now();
        let feed = build_feed(Vec::new(), &config, now);

        assert_eq!(feed.item_count(), 1);
        let item = &feed.items[0];
        assert_eq!(item.title, PLACEHOLDER_TITLE);
        assert_eq!(item.description, PLACEHOLDER_DESCRIPTION);
        assert_eq!(item.url, "https://www.wbtv.com/news/");
        assert_eq!(item.published_at, now);
    }

    #[test]
    fn test_build_error_feed() {
        let config = FeedConfig::default();
        let feed = build_error_feed("connection reset", &config, Utc::now());

        assert_eq!(feed.title, "WBTV News Feed - Error");
        assert_eq!(feed.description, "Error occurred while generating feed");
        assert_eq!(feed.ttl, None);
        assert_eq!(feed.item_count(), 1);
        assert_eq!(feed.items[0].title, ERROR_ITEM_TITLE);
        assert_eq!(
            feed.items[0].description,
            "An error occurred: connection reset"
        );
    }

    #[test]
    fn test_to_xml_channel_and_items() {
        let config = FeedConfig::default();
        let feed = build_feed(vec![record(1), record(2)], &config, Utc::now());
        let xml = to_xml(&feed).unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">"#));
        assert!(xml.contains("<title>WBTV News Feed</title>"));
        assert!(xml.contains("<link>https://www.wbtv.com/news/</link>"));
        assert!(xml.contains(
            r#"<atom:link href="https://rajkboddu.github.io/wbtv-rss-feed/feed.xml" rel="self" type="application/rss+xml"/>"#
        ));
        assert!(xml.contains("<language>en</language>"));
        assert!(xml.contains("<ttl>60</ttl>"));
        assert_eq!(xml.matches("<item>").count(), 2);
        assert!(xml.contains("<title>Local headline number 1</title>"));
        assert!(xml.contains(
            r#"<guid isPermaLink="true">https://www.wbtv.com/news/story-2</guid>"#
        ));
        assert!(xml.trim_end().ends_with("</rss>"));
    }

    #[test]
    fn test_to_xml_escapes_text() {
        let config = FeedConfig::default();
        let mut item = record(1);
        item.title = "Tom & Jerry <live> tonight".to_string();
        let feed = build_feed(vec![item], &config, Utc::now());
        let xml = to_xml(&feed).unwrap();

        assert!(xml.contains("Tom &amp; Jerry &lt;live&gt; tonight"));
        assert!(!xml.contains("<live>"));
    }

    #[test]
    fn test_to_xml_strips_control_characters() {
        let config = FeedConfig::default();
        let mut item = record(1);
        item.title = "Breaking\u{0008} news\u{001B} from uptown".to_string();
        item.description = "Line one\nline two\tend\u{0000}".to_string();
        let feed = build_feed(vec![item], &config, Utc::now());
        let xml = to_xml(&feed).unwrap();

        assert!(!xml.contains('\u{0008}'));
        assert!(!xml.contains('\u{001B}'));
        assert!(!xml.contains('\u{0000}'));
        assert!(xml.contains("<title>Breaking news from uptown</title>"));
        assert!(xml.contains("Line one\nline two\tend"));
    }

    #[test]
    fn test_sanitize_text_keeps_whitespace_and_unicode() {
        assert_eq!(sanitize_text("Caf\u{00e9}\t\r\n"), "Caf\u{00e9}\t\r\n");
        assert_eq!(sanitize_text("a\u{0007}b\u{007F}c"), "abc");
    }

    #[test]
    fn test_to_xml_error_feed_has_no_ttl() {
        let config = FeedConfig::default();
        let feed = build_error_feed("boom", &config, Utc::now());
        let xml = to_xml(&feed).unwrap();

        assert!(!xml.contains("<ttl>"));
        assert_eq!(xml.matches("<item>").count(), 1);
        assert!(xml.contains("An error occurred: boom"));
    }

    #[tokio::test]
    async fn test_write_feed_overwrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.xml");
        std::fs::write(&path, "stale content from a previous run").unwrap();

        let config = FeedConfig::default();
        let feed = build_feed(Vec::new(), &config, Utc::now());
        write_feed(&feed, &path).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("stale content"));
        assert!(written.contains("<title>No articles found</title>"));
    }
}
