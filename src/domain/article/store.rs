use super::model::Article;
use crate::error::AppResult;
use async_trait::async_trait;
use serde::Serialize;

/// Articles older than this (by publish date) are purged on every write batch
pub const RETENTION_DAYS: i64 = 5;

/// Outcome of one upsert batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpsertSummary {
    pub purged: u64,
    pub inserted: usize,
    pub updated: usize,
    pub failed: usize,
}

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Purge expired rows, then insert or refresh each article by id.
    ///
    /// A failure on one article is logged and counted; the batch continues.
    async fn upsert(&self, articles: &[Article]) -> AppResult<UpsertSummary>;

    /// Every article published within the retention window, newest first
    async fn find_recent(&self) -> AppResult<Vec<Article>>;
}
