pub mod reqwest_fetcher;

pub use reqwest_fetcher::ReqwestFetcher;

use async_trait::async_trait;
use std::time::Duration;

/// Conventional desktop browser identity, so outlets don't reject us outright
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("upstream returned HTTP {0}")]
    Status(u16),
}

/// Outbound GET used by discovery, feed reads, scraping and enrichment.
///
/// Implementations must treat any non-2xx response as an error.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str, timeout: Duration) -> Result<String, FetchError>;
}
