use crate::domain::article::Article;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Upper bound on articles held in one snapshot
pub const SNAPSHOT_MAX_ARTICLES: usize = 500;

/// Immutable view of the most recent aggregation run
#[derive(Debug, Clone, Serialize)]
pub struct CacheSnapshot {
    pub articles_by_source: BTreeMap<String, Vec<Article>>,
    pub all_articles: Vec<Article>,
    pub last_updated: DateTime<Utc>,
    pub total_count: usize,
}

impl CacheSnapshot {
    /// Build from per-source results in run order. When over the bound the
    /// earliest-inserted articles are dropped first.
    pub fn build(runs: Vec<(String, Vec<Article>)>, last_updated: DateTime<Utc>) -> Self {
        let mut articles_by_source: BTreeMap<String, Vec<Article>> = runs
            .iter()
            .map(|(key, _)| (key.clone(), Vec::new()))
            .collect();

        let mut all_articles: Vec<Article> = runs.into_iter().flat_map(|(_, a)| a).collect();
        if all_articles.len() > SNAPSHOT_MAX_ARTICLES {
            let overflow = all_articles.len() - SNAPSHOT_MAX_ARTICLES;
            tracing::debug!(dropped = overflow, "Snapshot over capacity, dropping oldest entries");
            all_articles.drain(..overflow);
        }

        for article in &all_articles {
            articles_by_source
                .entry(article.source_key.clone())
                .or_default()
                .push(article.clone());
        }

        Self {
            total_count: all_articles.len(),
            articles_by_source,
            all_articles,
            last_updated,
        }
    }
}
