use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const SUMMARY_MAX_CHARS: usize = 300;
const ELLIPSIS: &str = "...";

/// A normalized, categorized article as persisted and served
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub link: String,
    pub author: Option<String>,
    pub publish_date: DateTime<Utc>,
    pub source_key: String,
    pub source_name: String,
    pub featured_image: Option<String>,
    pub category: String,
    pub fetched_at: DateTime<Utc>,
}

/// What a feed item or scraped block yields before the orchestrator
/// assigns identity, timestamps and a category
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawArticle {
    /// Feed guid, when the upstream supplies one
    pub guid: Option<String>,
    pub title: String,
    pub summary: String,
    pub link: String,
    pub author: Option<String>,
    pub publish_date: Option<DateTime<Utc>>,
    pub featured_image: Option<String>,
}

/// Collapse whitespace and cap at [`SUMMARY_MAX_CHARS`], ellipsis included
pub fn truncate_summary(text: &str) -> String {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.chars().count() <= SUMMARY_MAX_CHARS {
        return normalized;
    }

    let keep = SUMMARY_MAX_CHARS - ELLIPSIS.len();
    let mut truncated: String = normalized.chars().take(keep).collect();
    truncated.truncate(truncated.trim_end().len());
    truncated.push_str(ELLIPSIS);
    truncated
}
