use super::catalog;
use super::error::RegistryError;
use super::model::{FetchMethod, Source, SourceStats};
use crate::error::AppResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

/// Durable backing for the registry's learned state
#[async_trait]
pub trait SourceStore: Send + Sync {
    /// All sources in registry order (by key)
    async fn load_all(&self) -> AppResult<Vec<Source>>;

    /// Insert a seed source unless one with the same key already exists
    async fn insert_if_absent(&self, source: &Source) -> AppResult<()>;

    async fn save_feed_url(&self, source_key: &str, feed_url: &str) -> AppResult<()>;

    async fn save_attempt(
        &self,
        source_key: &str,
        method: FetchMethod,
        success: bool,
        at: DateTime<Utc>,
    ) -> AppResult<()>;
}

/// Single source of truth for "who to crawl".
///
/// Holds the catalog in memory; learned state (feed URLs, counters) is
/// updated in memory first and then written through to the store. Readers
/// always get a cloned snapshot, never a half-applied update.
pub struct SourceRegistry {
    store: Arc<dyn SourceStore>,
    sources: RwLock<Vec<Source>>,
}

impl SourceRegistry {
    /// Seed missing catalog entries and load the registry from the store
    pub async fn bootstrap(store: Arc<dyn SourceStore>) -> Result<Self, RegistryError> {
        for seed in catalog::seed_sources() {
            store
                .insert_if_absent(&seed)
                .await
                .map_err(|e| RegistryError::Load(e.to_string()))?;
        }

        let sources = store
            .load_all()
            .await
            .map_err(|e| RegistryError::Load(e.to_string()))?;

        tracing::info!(count = sources.len(), "Source registry loaded");

        Self::from_sources(store, sources)
    }

    pub fn from_sources(
        store: Arc<dyn SourceStore>,
        mut sources: Vec<Source>,
    ) -> Result<Self, RegistryError> {
        if sources.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = HashSet::new();
        for source in &sources {
            if !seen.insert(source.source_key.clone()) {
                return Err(RegistryError::DuplicateKey(source.source_key.clone()));
            }
            if url::Url::parse(&source.listing_url).is_err() {
                return Err(RegistryError::InvalidListingUrl {
                    key: source.source_key.clone(),
                    url: source.listing_url.clone(),
                });
            }
        }

        sources.sort_by(|a, b| a.source_key.cmp(&b.source_key));

        Ok(Self {
            store,
            sources: RwLock::new(sources),
        })
    }

    pub fn get(&self, key: &str) -> Option<Source> {
        self.read().iter().find(|s| s.source_key == key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.read().iter().any(|s| s.source_key == key)
    }

    /// Active sources in registry order
    pub fn list_active(&self) -> Vec<Source> {
        self.read().iter().filter(|s| s.is_active).cloned().collect()
    }

    /// Every registered key in registry order, active or not
    pub fn keys(&self) -> Vec<String> {
        self.read().iter().map(|s| s.source_key.clone()).collect()
    }

    pub fn stats(&self) -> Vec<SourceStats> {
        self.read().iter().map(SourceStats::from).collect()
    }

    /// Remember a discovered feed URL so later runs skip discovery
    pub async fn learn_feed_url(&self, key: &str, feed_url: &str) {
        {
            let mut sources = self.write();
            match sources.iter_mut().find(|s| s.source_key == key) {
                Some(source) => source.feed_url = Some(feed_url.to_string()),
                None => {
                    tracing::warn!(source_key = %key, "Feed URL learned for unknown source");
                    return;
                }
            }
        }

        if let Err(e) = self.store.save_feed_url(key, feed_url).await {
            tracing::error!(source_key = %key, error = %e, "Failed to persist learned feed URL");
        } else {
            tracing::info!(source_key = %key, feed_url = %feed_url, "Saved discovered feed URL");
        }
    }

    pub async fn mark_attempt(&self, key: &str, method: FetchMethod, success: bool) {
        let now = Utc::now();
        {
            let mut sources = self.write();
            match sources.iter_mut().find(|s| s.source_key == key) {
                Some(source) => source.record_attempt(method, success, now),
                None => {
                    tracing::warn!(source_key = %key, "Attempt recorded for unknown source");
                    return;
                }
            }
        }

        if let Err(e) = self.store.save_attempt(key, method, success, now).await {
            tracing::error!(source_key = %key, error = %e, "Failed to persist source statistics");
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Source>> {
        self.sources.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Source>> {
        self.sources.write().unwrap_or_else(PoisonError::into_inner)
    }
}
