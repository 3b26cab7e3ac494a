use super::model::{FetchMethod, Source};
use std::sync::LazyLock;

/// Seed entry for an outlet known at deployment time
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub key: &'static str,
    pub display_name: &'static str,
    pub domain: &'static str,
    pub listing_url: &'static str,
    pub feed_url: Option<&'static str>,
    pub default_categories: &'static [&'static str],
}

impl CatalogEntry {
    pub fn to_source(&self) -> Source {
        Source {
            source_key: self.key.to_string(),
            display_name: self.display_name.to_string(),
            domain: self.domain.to_string(),
            listing_url: self.listing_url.to_string(),
            feed_url: self.feed_url.map(str::to_string),
            default_categories: self
                .default_categories
                .iter()
                .map(|c| c.to_string())
                .collect(),
            is_active: true,
            fetch_count: 0,
            error_count: 0,
            last_fetched_at: None,
            last_method: FetchMethod::None,
        }
    }
}

pub static CATALOG: LazyLock<Vec<CatalogEntry>> = LazyLock::new(|| {
    vec![
        CatalogEntry {
            key: "bbc",
            display_name: "BBC Health",
            domain: "bbc.com",
            listing_url: "https://www.bbc.com/news/health",
            feed_url: None,
            default_categories: &["Public Health", "News", "Medical Research"],
        },
        CatalogEntry {
            key: "guardian",
            display_name: "Guardian Nigeria",
            domain: "guardian.ng",
            listing_url: "https://guardian.ng/category/features/health/",
            feed_url: None,
            default_categories: &["Public Health", "News"],
        },
        CatalogEntry {
            key: "healthcom",
            display_name: "HealthCom",
            domain: "health.com",
            listing_url: "https://www.health.com/news",
            feed_url: None,
            default_categories: &["General Health", "Wellness"],
        },
        CatalogEntry {
            key: "healthywomen",
            display_name: "HealthyWomen",
            domain: "healthywomen.org",
            listing_url: "https://www.healthywomen.org/condition",
            feed_url: None,
            default_categories: &["Women's Health"],
        },
    ]
});

/// Seed sources in registry order
pub fn seed_sources() -> Vec<Source> {
    CATALOG.iter().map(CatalogEntry::to_source).collect()
}
