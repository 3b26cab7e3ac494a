use super::error::IngestionError;
use crate::domain::article::{truncate_summary, RawArticle};
use crate::infrastructure::fetch::HttpFetcher;
use feed_rs::model::{Entry, Feed};
use scraper::Html;
use std::sync::Arc;
use std::time::Duration;

/// Reads RSS/Atom feeds into raw article records
pub struct FeedReader {
    fetcher: Arc<dyn HttpFetcher>,
    timeout: Duration,
}

impl FeedReader {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }

    /// Items of the feed, or an empty list on any fetch/parse failure
    pub async fn read(&self, feed_url: &str, source_key: &str) -> Vec<RawArticle> {
        tracing::info!(source_key = %source_key, feed_url = %feed_url, "Parsing feed");

        match self.try_read(feed_url).await {
            Ok(items) => {
                tracing::info!(
                    source_key = %source_key,
                    feed_url = %feed_url,
                    count = items.len(),
                    "Feed parsed"
                );
                items
            }
            Err(e) => {
                tracing::warn!(
                    source_key = %source_key,
                    feed_url = %feed_url,
                    error = %e,
                    "Feed read failed"
                );
                Vec::new()
            }
        }
    }

    async fn try_read(&self, feed_url: &str) -> Result<Vec<RawArticle>, IngestionError> {
        let body = self.fetcher.fetch_text(feed_url, self.timeout).await?;
        parse_feed(body.as_bytes())
    }
}

/// Parse a feed document. Items without a title or link are dropped.
pub fn parse_feed(body: &[u8]) -> Result<Vec<RawArticle>, IngestionError> {
    // Items without a guid/id keep an empty id so the link becomes their identity
    let parser = feed_rs::parser::Builder::new()
        .id_generator(|_links, _title, _uri| String::new())
        .build();
    let feed = parser.parse(body)?;
    let feed_title = feed_title(&feed);

    let items = feed
        .entries
        .into_iter()
        .filter_map(|entry| entry_to_raw(entry, feed_title.as_deref()))
        .collect();

    Ok(items)
}

fn feed_title(feed: &Feed) -> Option<String> {
    feed.title
        .as_ref()
        .map(|t| t.content.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn entry_to_raw(entry: Entry, feed_title: Option<&str>) -> Option<RawArticle> {
    let title = entry
        .title
        .as_ref()
        .map(|t| collapse(&html_to_text(&t.content)))
        .unwrap_or_default();
    let link = entry
        .links
        .iter()
        .map(|l| l.href.trim())
        .find(|href| !href.is_empty())
        .map(str::to_string);

    let Some(link) = link.filter(|_| !title.is_empty()) else {
        tracing::debug!(entry_id = %entry.id, "Skipping feed item without title or link");
        return None;
    };

    let description = entry
        .summary
        .as_ref()
        .map(|s| s.content.clone())
        .or_else(|| entry.content.as_ref().and_then(|c| c.body.clone()))
        .unwrap_or_default();

    let author = entry
        .authors
        .iter()
        .map(|p| p.name.trim())
        .find(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| feed_title.map(str::to_string));

    let guid = Some(entry.id.trim().to_string()).filter(|id| !id.is_empty());

    Some(RawArticle {
        guid,
        title,
        summary: truncate_summary(&html_to_text(&description)),
        link,
        author,
        publish_date: entry.published.or(entry.updated),
        featured_image: media_image(&entry),
    })
}

/// First thumbnail, else first image-typed media content
fn media_image(entry: &Entry) -> Option<String> {
    let thumbnail = entry
        .media
        .iter()
        .flat_map(|m| m.thumbnails.iter())
        .map(|t| t.image.uri.clone())
        .find(|uri| !uri.is_empty());

    thumbnail.or_else(|| {
        entry
            .media
            .iter()
            .flat_map(|m| m.content.iter())
            .filter(|c| {
                c.content_type
                    .as_ref()
                    .map(|mime| mime.ty() == "image")
                    .unwrap_or(false)
            })
            .find_map(|c| c.url.as_ref().map(|u| u.to_string()))
    })
}

fn html_to_text(fragment: &str) -> String {
    if !fragment.contains('<') {
        return fragment.to_string();
    }
    Html::parse_fragment(fragment)
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
