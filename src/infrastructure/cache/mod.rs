use crate::domain::query::CacheSnapshot;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

const RECENT_ARTICLES_KEY: &str = "recent_articles";

pub const SNAPSHOT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Single-slot, time-limited holder of the latest aggregation snapshot.
///
/// Writers replace the whole `Arc`, so readers see either the previous
/// snapshot or the new one, never a partial one.
#[derive(Clone)]
pub struct ArticleCache {
    slot: Cache<&'static str, Arc<CacheSnapshot>>,
}

impl ArticleCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Cache::builder().time_to_live(ttl).build(),
        }
    }

    pub async fn get(&self) -> Option<Arc<CacheSnapshot>> {
        self.slot.get(&RECENT_ARTICLES_KEY).await
    }

    pub async fn put(&self, snapshot: CacheSnapshot) {
        let total = snapshot.total_count;
        self.slot.insert(RECENT_ARTICLES_KEY, Arc::new(snapshot)).await;
        tracing::info!(total = total, "Updated article cache");
    }
}

impl Default for ArticleCache {
    fn default() -> Self {
        Self::new(SNAPSHOT_TTL)
    }
}
