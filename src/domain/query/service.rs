use super::relevance::relevance_score;
use crate::domain::article::{Article, ArticleStore};
use crate::domain::category::Categorizer;
use crate::domain::source::SourceRegistry;
use crate::infrastructure::cache::ArticleCache;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

const UNAVAILABLE_STATUS: &str = "Articles are temporarily unavailable";

/// Optional, AND-combined filters. Blank strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub source: Option<String>,
}

impl ArticleFilter {
    pub fn new(keyword: Option<String>, category: Option<String>, source: Option<String>) -> Self {
        Self {
            keyword: non_blank(keyword),
            category: non_blank(category),
            source: non_blank(source),
        }
    }

    fn matches(&self, article: &Article) -> bool {
        if let Some(keyword) = &self.keyword {
            let keyword = keyword.to_lowercase();
            let hit = article.title.to_lowercase().contains(&keyword)
                || article.summary.to_lowercase().contains(&keyword)
                || article.category.to_lowercase().contains(&keyword);
            if !hit {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if article.category.to_lowercase() != category.to_lowercase() {
                return false;
            }
        }

        match &self.source {
            Some(source) => article.source_key == *source,
            None => true,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredArticle {
    #[serde(flatten)]
    pub article: Article,
    pub relevance_score: f64,
}

/// Where a result set was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultOrigin {
    Cache,
    Store,
    Unavailable,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticlesResult {
    /// Every match, highest relevance first
    pub ranked: Vec<ScoredArticle>,
    /// The same matches partitioned by source; every registered source has a bucket
    pub by_source: BTreeMap<String, Vec<ScoredArticle>>,
    pub total: usize,
    pub last_updated: Option<DateTime<Utc>>,
    pub origin: ResultOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Read side of the pipeline: cache first, durable store as fallback
pub struct ArticleQueryService {
    cache: ArticleCache,
    store: Arc<dyn ArticleStore>,
    registry: Arc<SourceRegistry>,
    categorizer: Arc<Categorizer>,
}

impl ArticleQueryService {
    pub fn new(
        cache: ArticleCache,
        store: Arc<dyn ArticleStore>,
        registry: Arc<SourceRegistry>,
        categorizer: Arc<Categorizer>,
    ) -> Self {
        Self {
            cache,
            store,
            registry,
            categorizer,
        }
    }

    /// Filtered, relevance-ranked articles grouped by source.
    ///
    /// Never fails: an unreachable store yields an empty result with a status.
    pub async fn get_articles(&self, filter: &ArticleFilter) -> ArticlesResult {
        let (articles, last_updated, origin) = self.load_corpus().await;
        let now = Utc::now();
        let keyword = filter.keyword.as_deref();

        let mut ranked: Vec<ScoredArticle> = articles
            .into_iter()
            .filter(|a| filter.matches(a))
            .map(|article| ScoredArticle {
                relevance_score: relevance_score(&article, keyword, now),
                article,
            })
            .collect();

        // stable, so equal scores keep corpus order
        ranked.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));

        let mut by_source: BTreeMap<String, Vec<ScoredArticle>> = self
            .registry
            .keys()
            .into_iter()
            .map(|key| (key, Vec::new()))
            .collect();
        for scored in &ranked {
            by_source
                .entry(scored.article.source_key.clone())
                .or_default()
                .push(scored.clone());
        }

        tracing::debug!(
            origin = ?origin,
            keyword = ?filter.keyword,
            category = ?filter.category,
            source = ?filter.source,
            total = ranked.len(),
            "Articles queried"
        );

        ArticlesResult {
            total: ranked.len(),
            ranked,
            by_source,
            last_updated,
            status: (origin == ResultOrigin::Unavailable).then(|| UNAVAILABLE_STATUS.to_string()),
            origin,
        }
    }

    pub async fn find_article(&self, article_id: &str) -> Option<Article> {
        let (articles, _, _) = self.load_corpus().await;
        articles.into_iter().find(|a| a.id == article_id)
    }

    /// Predefined, dynamic and default labels, sorted
    pub fn categories(&self) -> Vec<String> {
        self.categorizer.all_labels()
    }

    async fn load_corpus(&self) -> (Vec<Article>, Option<DateTime<Utc>>, ResultOrigin) {
        if let Some(snapshot) = self.cache.get().await {
            return (
                snapshot.all_articles.clone(),
                Some(snapshot.last_updated),
                ResultOrigin::Cache,
            );
        }

        match self.store.find_recent().await {
            Ok(articles) => (articles, None, ResultOrigin::Store),
            Err(e) => {
                tracing::error!(error = %e, "Article store unreachable and cache empty");
                (Vec::new(), None, ResultOrigin::Unavailable)
            }
        }
    }
}
