use async_trait::async_trait;
use chrono::Utc;
use healthwire::infrastructure::fetch::{FetchError, HttpFetcher};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;

pub const BBC_LISTING: &str = "https://www.bbc.com/news/health";
pub const GUARDIAN_LISTING: &str = "https://guardian.ng/category/features/health/";
pub const GUARDIAN_FEED: &str = "https://guardian.ng/category/features/health/feed/";
pub const HEALTHCOM_LISTING: &str = "https://www.health.com/news";
pub const HEALTHYWOMEN_LISTING: &str = "https://www.healthywomen.org/condition";

pub const BBC_INSULIN_ID: &str = "https://www.bbc.com/news/health-101";

/// Stands in for the outlets: canned pages by URL, 404 for anything else
pub struct StubUpstream {
    pages: RwLock<HashMap<String, Result<String, u16>>>,
}

impl StubUpstream {
    pub fn new() -> Self {
        Self {
            pages: RwLock::new(HashMap::new()),
        }
    }

    /// BBC only scrapes, Guardian advertises a feed, the other two are down
    pub fn with_default_outlets() -> Self {
        let upstream = Self::new();
        upstream.serve(BBC_LISTING, BBC_LISTING_HTML);
        upstream.serve(GUARDIAN_LISTING, GUARDIAN_LISTING_HTML);
        upstream.serve(GUARDIAN_FEED, &guardian_feed());
        upstream.fail(HEALTHCOM_LISTING, 503);
        upstream.fail(HEALTHYWOMEN_LISTING, 503);
        upstream.serve(
            BBC_INSULIN_ID,
            r#"<meta property="og:image" content="https://ichef.bbci.co.uk/insulin.jpg">"#,
        );
        upstream
    }

    pub fn serve(&self, url: &str, body: &str) {
        self.pages.write().insert(url.to_string(), Ok(body.to_string()));
    }

    pub fn fail(&self, url: &str, status: u16) {
        self.pages.write().insert(url.to_string(), Err(status));
    }
}

#[async_trait]
impl HttpFetcher for StubUpstream {
    async fn fetch_text(&self, url: &str, _timeout: Duration) -> Result<String, FetchError> {
        match self.pages.read().get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(FetchError::Status(*status)),
            None => Err(FetchError::Status(404)),
        }
    }
}

const BBC_LISTING_HTML: &str = r#"
<html><body>
  <div class="gs-c-promo">
    <a href="/news/health-101"><h3 class="gs-c-promo-heading">New insulin pricing rules</h3></a>
    <p class="gs-c-promo-summary">Glucose monitors also get cheaper.</p>
  </div>
  <div class="gs-c-promo">
    <a href="/news/health-102"><h3 class="gs-c-promo-heading">Gym attendance climbs</h3></a>
    <p class="gs-c-promo-summary">Exercise habits after the pandemic.</p>
  </div>
</body></html>"#;

const GUARDIAN_LISTING_HTML: &str = r#"
<html><head>
  <link rel="alternate" type="application/rss+xml" href="https://guardian.ng/category/features/health/feed/">
</head><body><p>Health</p></body></html>"#;

fn guardian_feed() -> String {
    let published = Utc::now().to_rfc2822();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>Guardian Nigeria Health</title>
    <link>https://guardian.ng/category/features/health/</link>
    <item>
      <title>Malaria vaccine reaches rural communities</title>
      <link>https://guardian.ng/features/health/malaria-vaccine</link>
      <guid>guardian-malaria-vaccine</guid>
      <description>Nets and vaccine doses arrive before the rainy season, clinical teams say.</description>
      <pubDate>{published}</pubDate>
      <media:thumbnail url="https://guardian.ng/images/malaria.jpg" />
    </item>
    <item>
      <title>Breast cancer screening drive</title>
      <link>https://guardian.ng/features/health/screening</link>
      <guid>guardian-screening</guid>
      <description>Free mammograms in Lagos this month.</description>
      <pubDate>{published}</pubDate>
    </item>
  </channel>
</rss>"#
    )
}
