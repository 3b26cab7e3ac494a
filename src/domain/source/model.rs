use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An outlet the aggregator crawls, plus the state learned about it at runtime
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Source {
    pub source_key: String,
    pub display_name: String,
    pub domain: String,
    pub listing_url: String,
    pub feed_url: Option<String>,
    pub default_categories: Vec<String>,
    pub is_active: bool,
    pub fetch_count: i32,
    pub error_count: i32,
    pub last_fetched_at: Option<DateTime<Utc>>,
    pub last_method: FetchMethod,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "text")]
#[sqlx(rename_all = "lowercase")]
pub enum FetchMethod {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "feed")]
    Feed,
    #[serde(rename = "scrape")]
    Scrape,
}

impl std::fmt::Display for FetchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchMethod::None => write!(f, "none"),
            FetchMethod::Feed => write!(f, "feed"),
            FetchMethod::Scrape => write!(f, "scrape"),
        }
    }
}

/// Operational view of a source for health/diagnostics reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceStats {
    pub source_key: String,
    pub display_name: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_url: Option<String>,
    pub fetch_count: i32,
    pub error_count: i32,
    pub last_method: FetchMethod,
    pub last_fetched_at: Option<DateTime<Utc>>,
}

impl From<&Source> for SourceStats {
    fn from(source: &Source) -> Self {
        Self {
            source_key: source.source_key.clone(),
            display_name: source.display_name.clone(),
            is_active: source.is_active,
            feed_url: source.feed_url.clone(),
            fetch_count: source.fetch_count,
            error_count: source.error_count,
            last_method: source.last_method,
            last_fetched_at: source.last_fetched_at,
        }
    }
}

impl Source {
    /// Apply the outcome of one orchestration attempt.
    ///
    /// A successful attempt bumps `fetch_count` and records the method used;
    /// a failed one only bumps `error_count`, leaving the last good method visible.
    pub fn record_attempt(&mut self, method: FetchMethod, success: bool, at: DateTime<Utc>) {
        if success {
            self.fetch_count += 1;
            self.last_method = method;
            self.last_fetched_at = Some(at);
        } else {
            self.error_count += 1;
        }
    }
}
