use super::error::IngestionError;
use crate::infrastructure::fetch::HttpFetcher;
use scraper::{Html, Selector};
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use url::Url;

/// Feed link candidates, most specific first; the first hit wins
static FEED_LINK_SELECTORS: LazyLock<Vec<(Selector, &'static str)>> = LazyLock::new(|| {
    [
        r#"link[type="application/rss+xml"]"#,
        r#"link[type="application/atom+xml"]"#,
        r#"link[rel="alternate"][type*="rss"]"#,
        r#"link[rel="alternate"][type*="xml"]"#,
        r#"a[href*="/rss"]"#,
        r#"a[href*="/feed"]"#,
        r#"a[href*="rss.xml"]"#,
    ]
    .into_iter()
    .map(|css| (Selector::parse(css).expect("static feed selector"), css))
    .collect()
});

/// Outcome of looking at a listing page for a feed
#[derive(Debug, Default, PartialEq)]
pub struct Discovery {
    pub feed_url: Option<String>,
    /// The listing page as fetched, handed on so a scrape fallback doesn't refetch it
    pub listing_html: Option<String>,
}

/// Locates a machine-readable feed advertised by a listing page
pub struct FeedDiscovery {
    fetcher: Arc<dyn HttpFetcher>,
    timeout: Duration,
}

impl FeedDiscovery {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }

    /// Absolute feed URL when the page advertises one.
    ///
    /// No feed means "go scrape", never "give up on the source".
    pub async fn discover(&self, page_url: &str) -> Discovery {
        tracing::info!(url = %page_url, "Discovering feed");

        let (base, html) = match self.fetch_listing(page_url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(url = %page_url, error = %e, "Feed discovery failed");
                return Discovery::default();
            }
        };

        let feed_url = find_feed_link(&html, &base);
        match &feed_url {
            Some(feed_url) => {
                tracing::info!(url = %page_url, feed_url = %feed_url, "Feed discovered")
            }
            None => tracing::info!(url = %page_url, "No feed advertised"),
        }

        Discovery {
            feed_url,
            listing_html: Some(html),
        }
    }

    async fn fetch_listing(&self, page_url: &str) -> Result<(Url, String), IngestionError> {
        let base = Url::parse(page_url).map_err(|e| IngestionError::InvalidUrl {
            url: page_url.to_string(),
            reason: e.to_string(),
        })?;
        let html = self.fetcher.fetch_text(page_url, self.timeout).await?;
        Ok((base, html))
    }
}

/// Search a listing page for a feed link, resolving it against the page URL
pub fn find_feed_link(html: &str, page_url: &Url) -> Option<String> {
    let document = Html::parse_document(html);

    FEED_LINK_SELECTORS.iter().find_map(|(selector, css)| {
        let href = document
            .select(selector)
            .filter_map(|el| el.value().attr("href"))
            .map(str::trim)
            .find(|href| !href.is_empty())?;

        match page_url.join(href) {
            Ok(resolved) => {
                tracing::debug!(selector = %css, href = %href, "Feed link matched");
                Some(resolved.to_string())
            }
            Err(_) => None,
        }
    })
}
