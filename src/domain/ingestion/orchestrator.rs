use super::discovery::FeedDiscovery;
use super::enricher::MetadataEnricher;
use super::feed_reader::FeedReader;
use super::scraper::PageScraper;
use crate::domain::article::{truncate_summary, Article, RawArticle};
use crate::domain::category::Categorizer;
use crate::domain::source::{FetchMethod, Source, SourceRegistry};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;

/// Result of one hybrid attempt against one source
#[derive(Debug, Clone)]
pub struct SourceOutcome {
    pub source_key: String,
    pub method: FetchMethod,
    pub articles: Vec<Article>,
}

impl SourceOutcome {
    pub fn empty(source_key: &str) -> Self {
        Self {
            source_key: source_key.to_string(),
            method: FetchMethod::None,
            articles: Vec::new(),
        }
    }
}

/// Runs the hybrid policy for a single source: feed first, scrape as fallback.
pub struct SourceOrchestrator {
    registry: Arc<SourceRegistry>,
    discovery: FeedDiscovery,
    reader: FeedReader,
    scraper: PageScraper,
    enricher: MetadataEnricher,
    categorizer: Arc<Categorizer>,
    max_articles_per_source: usize,
}

impl SourceOrchestrator {
    pub fn new(
        registry: Arc<SourceRegistry>,
        discovery: FeedDiscovery,
        reader: FeedReader,
        scraper: PageScraper,
        enricher: MetadataEnricher,
        categorizer: Arc<Categorizer>,
        max_articles_per_source: usize,
    ) -> Self {
        Self {
            registry,
            discovery,
            reader,
            scraper,
            enricher,
            categorizer,
            max_articles_per_source,
        }
    }

    pub async fn fetch_source(&self, source: &Source) -> SourceOutcome {
        tracing::info!(source_key = %source.source_key, name = %source.display_name, "Processing source");

        let (method, raw) = self.collect(source).await;
        let success = !raw.is_empty();

        self.registry
            .mark_attempt(&source.source_key, method, success)
            .await;

        if !success {
            tracing::warn!(source_key = %source.source_key, "Feed and scrape both yielded nothing");
            return SourceOutcome::empty(&source.source_key);
        }

        let articles = self.finalize(source, raw).await;

        tracing::info!(
            source_key = %source.source_key,
            method = %method,
            count = articles.len(),
            "Source processed"
        );

        SourceOutcome {
            source_key: source.source_key.clone(),
            method,
            articles,
        }
    }

    /// Discovery, feed, then scrape. A feed that comes back empty keeps its
    /// URL; only this attempt falls through to scraping.
    async fn collect(&self, source: &Source) -> (FetchMethod, Vec<RawArticle>) {
        let mut feed_url = source.feed_url.clone();
        let mut listing_html = None;

        if feed_url.is_none() {
            let discovery = self.discovery.discover(&source.listing_url).await;
            if let Some(url) = &discovery.feed_url {
                self.registry.learn_feed_url(&source.source_key, url).await;
            }
            feed_url = discovery.feed_url;
            listing_html = discovery.listing_html;
        }

        if let Some(url) = &feed_url {
            let items = self.reader.read(url, &source.source_key).await;
            if !items.is_empty() {
                return (FetchMethod::Feed, items);
            }
        }

        tracing::info!(source_key = %source.source_key, "Falling back to scraping");
        let items = self.scraper.scrape(source, listing_html).await;
        if items.is_empty() {
            (FetchMethod::None, items)
        } else {
            (FetchMethod::Scrape, items)
        }
    }

    /// The one place ids, timestamps and categories are assigned
    async fn finalize(&self, source: &Source, raw: Vec<RawArticle>) -> Vec<Article> {
        let fetched_at = Utc::now();
        let mut seen_ids = HashSet::new();
        let mut articles = Vec::new();

        for mut item in raw.into_iter().take(self.max_articles_per_source) {
            if item.featured_image.is_none() {
                if let Some(metadata) = self.enricher.enrich(&item.link).await {
                    item.featured_image = metadata.image;
                    if item.title.is_empty() {
                        item.title = metadata.title.unwrap_or_default();
                    }
                    if item.summary.is_empty() {
                        item.summary = truncate_summary(&metadata.description.unwrap_or_default());
                    }
                }
            }

            let publish_date = item.publish_date.unwrap_or(fetched_at);
            let id = item
                .guid
                .clone()
                .or_else(|| Some(item.link.clone()).filter(|l| !l.is_empty()))
                .unwrap_or_else(|| {
                    format!("{}_{}", source.source_key, publish_date.timestamp_millis())
                });

            if !seen_ids.insert(id.clone()) {
                tracing::debug!(source_key = %source.source_key, id = %id, "Duplicate item skipped");
                continue;
            }

            let category = self.categorizer.categorize(&item.title, &item.summary);

            articles.push(Article {
                id,
                title: item.title,
                summary: item.summary,
                link: item.link,
                author: item.author,
                publish_date,
                source_key: source.source_key.clone(),
                source_name: source.display_name.clone(),
                featured_image: item.featured_image,
                category,
                fetched_at,
            });
        }

        articles
    }
}
