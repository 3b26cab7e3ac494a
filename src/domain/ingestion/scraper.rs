use super::error::IngestionError;
use crate::domain::article::{truncate_summary, RawArticle};
use crate::domain::source::Source;
use crate::infrastructure::fetch::HttpFetcher;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use url::Url;

/// Extracts raw articles from a parsed listing page
pub type ScrapeFn = fn(&Html) -> Vec<RawArticle>;

/// Selector candidates for one site, in preference order within each list
struct SiteSelectors {
    containers: Selector,
    title: Selector,
    summary: Selector,
    link: Selector,
    /// Origin used to absolutize relative links; `None` leaves them for the caller
    origin: Option<Url>,
}

impl SiteSelectors {
    fn new(containers: &str, title: &str, summary: &str, origin: Option<&str>) -> Self {
        Self {
            containers: Selector::parse(containers).expect("static container selector"),
            title: Selector::parse(title).expect("static title selector"),
            summary: Selector::parse(summary).expect("static summary selector"),
            link: Selector::parse("a[href]").expect("static link selector"),
            origin: origin.map(|o| Url::parse(o).expect("static site origin")),
        }
    }
}

static HEALTHYWOMEN: LazyLock<SiteSelectors> = LazyLock::new(|| {
    SiteSelectors::new(
        ".css-1wy8uaa, .css-article-card, article, .post",
        "h2, h3, .title, .headline",
        "p, .summary, .excerpt",
        Some("https://www.healthywomen.org"),
    )
});

static HEALTHCOM: LazyLock<SiteSelectors> = LazyLock::new(|| {
    SiteSelectors::new(
        "article, .post, .blog-post, .entry",
        "h2, h3, .entry-title, .post-title",
        "p, .excerpt, .entry-summary",
        Some("https://www.health.com"),
    )
});

static GUARDIAN: LazyLock<SiteSelectors> = LazyLock::new(|| {
    SiteSelectors::new(
        "article, .post, .ng-post, .entry",
        "h2, h3, .post-title, .entry-title",
        "p, .excerpt, .post-excerpt",
        Some("https://guardian.ng"),
    )
});

static BBC: LazyLock<SiteSelectors> = LazyLock::new(|| {
    SiteSelectors::new(
        "article, .media, .story-body, .gs-c-promo",
        "h3, h2, .gs-c-promo-heading, .media__title",
        "p, .gs-c-promo-summary, .media__summary",
        Some("https://www.bbc.com"),
    )
});

static GENERIC: LazyLock<SiteSelectors> = LazyLock::new(|| {
    SiteSelectors::new(
        "article, .post, .entry, .story",
        "h1, h2, h3, .title, .headline",
        "p",
        None,
    )
});

/// Dedicated adapters by source key
static ADAPTERS: &[(&str, ScrapeFn)] = &[
    ("bbc", scrape_bbc),
    ("guardian", scrape_guardian),
    ("healthcom", scrape_healthcom),
    ("healthywomen", scrape_healthywomen),
];

pub fn scrape_healthywomen(document: &Html) -> Vec<RawArticle> {
    extract_blocks(document, &HEALTHYWOMEN)
}

pub fn scrape_healthcom(document: &Html) -> Vec<RawArticle> {
    extract_blocks(document, &HEALTHCOM)
}

pub fn scrape_guardian(document: &Html) -> Vec<RawArticle> {
    extract_blocks(document, &GUARDIAN)
}

pub fn scrape_bbc(document: &Html) -> Vec<RawArticle> {
    extract_blocks(document, &BBC)
}

pub fn scrape_generic(document: &Html) -> Vec<RawArticle> {
    extract_blocks(document, &GENERIC)
}

pub fn has_adapter(source_key: &str) -> bool {
    ADAPTERS.iter().any(|(key, _)| *key == source_key)
}

/// Adapter for a source key, falling back to the generic one
pub fn adapter_for(source_key: &str) -> ScrapeFn {
    ADAPTERS
        .iter()
        .find(|(key, _)| *key == source_key)
        .map(|(_, scrape)| *scrape)
        .unwrap_or(scrape_generic)
}

/// Walk every matching container; blocks lacking a title or link are skipped
fn extract_blocks(document: &Html, site: &SiteSelectors) -> Vec<RawArticle> {
    let mut seen_links = HashSet::new();

    document
        .select(&site.containers)
        .filter_map(|block| extract_block(block, site))
        .filter(|raw| seen_links.insert(raw.link.clone()))
        .collect()
}

fn extract_block(block: ElementRef<'_>, site: &SiteSelectors) -> Option<RawArticle> {
    let title = block.select(&site.title).next().map(element_text)?;
    if title.is_empty() {
        return None;
    }

    let href = block
        .select(&site.link)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .find(|href| !href.is_empty())?;

    let link = match &site.origin {
        Some(origin) if !is_absolute(href) => origin.join(href).ok()?.to_string(),
        _ => href.to_string(),
    };

    let summary = block
        .select(&site.summary)
        .next()
        .map(element_text)
        .unwrap_or_default();

    Some(RawArticle {
        title,
        summary: truncate_summary(&summary),
        link,
        ..Default::default()
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_absolute(href: &str) -> bool {
    href.starts_with("http://") || href.starts_with("https://")
}

/// Fetches a listing page and runs the source's adapter over it
pub struct PageScraper {
    fetcher: Arc<dyn HttpFetcher>,
    timeout: Duration,
}

impl PageScraper {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }

    /// Articles found on the listing page, with absolute links; empty on failure.
    ///
    /// `listing_html` is the page if it was already fetched this run.
    pub async fn scrape(&self, source: &Source, listing_html: Option<String>) -> Vec<RawArticle> {
        tracing::info!(
            source_key = %source.source_key,
            url = %source.listing_url,
            "Scraping listing page"
        );

        match self.try_scrape(source, listing_html).await {
            Ok(items) => {
                tracing::info!(
                    source_key = %source.source_key,
                    count = items.len(),
                    "Listing page scraped"
                );
                items
            }
            Err(e) => {
                tracing::warn!(
                    source_key = %source.source_key,
                    url = %source.listing_url,
                    error = %e,
                    "Scraping failed"
                );
                Vec::new()
            }
        }
    }

    async fn try_scrape(
        &self,
        source: &Source,
        listing_html: Option<String>,
    ) -> Result<Vec<RawArticle>, IngestionError> {
        let page_url = Url::parse(&source.listing_url).map_err(|e| IngestionError::InvalidUrl {
            url: source.listing_url.clone(),
            reason: e.to_string(),
        })?;
        let html = match listing_html {
            Some(html) => html,
            None => self.fetcher.fetch_text(&source.listing_url, self.timeout).await?,
        };

        if !has_adapter(&source.source_key) {
            tracing::debug!(source_key = %source.source_key, "No dedicated adapter, using generic");
        }
        let scrape = adapter_for(&source.source_key);
        let raw = scrape(&Html::parse_document(&html));

        Ok(resolve_links(raw, &page_url))
    }
}

/// Absolutize links the adapter left relative; drop any that can't be resolved
fn resolve_links(raw: Vec<RawArticle>, page_url: &Url) -> Vec<RawArticle> {
    raw.into_iter()
        .filter_map(|mut article| {
            if !is_absolute(&article.link) {
                article.link = page_url.join(&article.link).ok()?.to_string();
            }
            Some(article)
        })
        .collect()
}
