use super::error::IngestionError;
use crate::infrastructure::fetch::HttpFetcher;
use scraper::{Html, Selector};
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use url::Url;

static OG_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:image"]"#).expect("static selector"));
static TWITTER_IMAGE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[name="twitter:image"], meta[property="twitter:image"]"#)
        .expect("static selector")
});
static CONTENT_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".featured-image img, article img").expect("static selector"));
static OG_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:title"]"#).expect("static selector"));
static OG_DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[property="og:description"]"#).expect("static selector")
});

/// Descriptive metadata recovered from an article page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMetadata {
    pub image: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Best-effort Open Graph lookup for a single article page
pub struct MetadataEnricher {
    fetcher: Arc<dyn HttpFetcher>,
    delay: Duration,
    timeout: Duration,
    enabled: bool,
}

impl MetadataEnricher {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, delay: Duration, timeout: Duration, enabled: bool) -> Self {
        Self {
            fetcher,
            delay,
            timeout,
            enabled,
        }
    }

    /// Waits the politeness delay, then fetches and parses the page.
    /// Any failure yields `None`; a missing image is a valid outcome.
    pub async fn enrich(&self, article_url: &str) -> Option<PageMetadata> {
        if !self.enabled {
            return None;
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.try_enrich(article_url).await {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                tracing::debug!(url = %article_url, error = %e, "Metadata extraction failed");
                None
            }
        }
    }

    async fn try_enrich(&self, article_url: &str) -> Result<PageMetadata, IngestionError> {
        let page_url = Url::parse(article_url).map_err(|e| IngestionError::InvalidUrl {
            url: article_url.to_string(),
            reason: e.to_string(),
        })?;
        let html = self.fetcher.fetch_text(article_url, self.timeout).await?;
        Ok(parse_metadata(&html, &page_url))
    }
}

pub fn parse_metadata(html: &str, page_url: &Url) -> PageMetadata {
    let document = Html::parse_document(html);

    let meta_content = |selector: &Selector| {
        document
            .select(selector)
            .filter_map(|el| el.value().attr("content"))
            .map(str::trim)
            .find(|c| !c.is_empty())
            .map(str::to_string)
    };

    let image = meta_content(&OG_IMAGE)
        .or_else(|| meta_content(&TWITTER_IMAGE))
        .or_else(|| {
            document
                .select(&CONTENT_IMAGE)
                .filter_map(|el| el.value().attr("src"))
                .map(str::trim)
                .find(|src| !src.is_empty())
                .map(str::to_string)
        })
        .and_then(|src| page_url.join(&src).ok())
        .map(|url| url.to_string());

    PageMetadata {
        image,
        title: meta_content(&OG_TITLE),
        description: meta_content(&OG_DESCRIPTION),
    }
}
