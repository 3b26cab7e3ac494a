use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{
    domain::{
        article::{Article, UpsertSummary},
        ingestion::Aggregator,
        query::{ArticleFilter, ArticleQueryService, ArticlesResult, ResultOrigin, ScoredArticle},
        source::SourceRegistry,
    },
    error::{AppError, AppResult},
};

// Request DTOs
#[derive(Debug, Default, Deserialize)]
pub struct ArticlesQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub source: Option<String>,
    /// Per-response cap; 0 or absent means no limit
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub source: Option<String>,
}

// Response DTOs
#[derive(Debug, Serialize)]
pub struct ArticlesMetadata {
    pub total: usize,
    pub search_keyword: Option<String>,
    pub category: Option<String>,
    pub source: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub applied_limit: Option<usize>,
    pub origin: ResultOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ArticlesResponse {
    pub success: bool,
    pub data: BTreeMap<String, Vec<ScoredArticle>>,
    pub metadata: ArticlesMetadata,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub by_source: BTreeMap<String, Vec<ScoredArticle>>,
    pub all_articles: Vec<ScoredArticle>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct SearchMetadata {
    pub search_keyword: String,
    pub category: Option<String>,
    pub source: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub query: String,
    pub results: SearchResults,
    pub metadata: SearchMetadata,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct SourceArticlesMetadata {
    pub search_keyword: Option<String>,
    pub category: Option<String>,
    pub applied_limit: Option<usize>,
    pub last_updated: Option<DateTime<Utc>>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SourceArticlesResponse {
    pub success: bool,
    pub source: String,
    pub articles: Vec<ScoredArticle>,
    pub count: usize,
    pub total_available: usize,
    pub metadata: SourceArticlesMetadata,
}

#[derive(Debug, Serialize)]
pub struct RefreshResults {
    pub by_source: BTreeMap<String, usize>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub success: bool,
    pub message: String,
    pub results: RefreshResults,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored: Option<UpsertSummary>,
    pub timestamp: DateTime<Utc>,
    pub next_automatic_fetch: String,
}

#[derive(Debug, Serialize)]
pub struct SourceArticleStats {
    pub count: usize,
    pub latest_article: Option<DateTime<Utc>>,
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SystemHealth {
    pub data_origin: ResultOrigin,
    pub last_aggregation: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct ArticleStats {
    pub total_articles: usize,
    pub articles_by_source: BTreeMap<String, SourceArticleStats>,
    pub category_counts: BTreeMap<String, usize>,
    pub available_categories: Vec<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub system_health: SystemHealth,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: ArticleStats,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ArticleMetadata {
    pub source: String,
    pub category: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ArticleResponse {
    pub success: bool,
    pub article: Article,
    pub metadata: ArticleMetadata,
}

pub struct ArticlesController {
    query_service: Arc<ArticleQueryService>,
    aggregator: Arc<Aggregator>,
    registry: Arc<SourceRegistry>,
}

impl ArticlesController {
    pub fn new(
        query_service: Arc<ArticleQueryService>,
        aggregator: Arc<Aggregator>,
        registry: Arc<SourceRegistry>,
    ) -> Self {
        Self {
            query_service,
            aggregator,
            registry,
        }
    }

    /// GET /api/articles - Filtered articles grouped by source
    pub async fn list_articles(
        State(controller): State<Arc<ArticlesController>>,
        Query(query): Query<ArticlesQuery>,
    ) -> AppResult<Json<ArticlesResponse>> {
        let filter = ArticleFilter::new(query.search, query.category, query.source);
        let result = controller.query_service.get_articles(&filter).await;
        let limit = query.limit.filter(|l| *l > 0);

        let mut data = result.by_source;
        let mut total = result.total;
        if let Some(limit) = limit {
            let per_source = limit.div_ceil(data.len().max(1));
            for articles in data.values_mut() {
                articles.truncate(per_source);
            }
            total = data.values().map(Vec::len).sum();
        }

        Ok(Json(ArticlesResponse {
            success: true,
            data,
            metadata: ArticlesMetadata {
                total,
                search_keyword: filter.keyword,
                category: filter.category,
                source: filter.source,
                last_updated: result.last_updated,
                applied_limit: limit,
                origin: result.origin,
                status: result.status,
                timestamp: Utc::now(),
            },
        }))
    }

    /// GET /api/articles/search - Strict keyword search; `q` is required
    pub async fn search(
        State(controller): State<Arc<ArticlesController>>,
        Query(query): Query<SearchQuery>,
    ) -> AppResult<Json<SearchResponse>> {
        let keyword = query
            .q
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .ok_or_else(|| {
                AppError::BadRequest(
                    "Search query is required; provide a search term using the \"q\" parameter"
                        .to_string(),
                )
            })?;

        let filter = ArticleFilter::new(Some(keyword.clone()), query.category, query.source);
        let result: ArticlesResult = controller.query_service.get_articles(&filter).await;

        Ok(Json(SearchResponse {
            success: true,
            query: keyword.clone(),
            results: SearchResults {
                count: result.total,
                by_source: result.by_source,
                all_articles: result.ranked,
            },
            metadata: SearchMetadata {
                search_keyword: keyword,
                category: filter.category,
                source: filter.source,
                last_updated: result.last_updated,
                timestamp: Utc::now(),
            },
        }))
    }

    /// GET /api/articles/categories - Predefined plus discovered labels
    pub async fn categories(
        State(controller): State<Arc<ArticlesController>>,
    ) -> AppResult<Json<CategoriesResponse>> {
        let categories = controller.query_service.categories();
        Ok(Json(CategoriesResponse {
            success: true,
            count: categories.len(),
            categories,
        }))
    }

    /// GET /api/articles/source/{sourceKey} - Articles from one source
    pub async fn by_source(
        State(controller): State<Arc<ArticlesController>>,
        Path(source_key): Path<String>,
        Query(query): Query<ArticlesQuery>,
    ) -> AppResult<Json<SourceArticlesResponse>> {
        if !controller.registry.contains(&source_key) {
            return Err(AppError::BadRequest(format!(
                "Invalid source; must be one of: {}",
                controller.registry.keys().join(", ")
            )));
        }

        let filter = ArticleFilter::new(query.search, query.category, Some(source_key.clone()));
        let mut result = controller.query_service.get_articles(&filter).await;
        let mut articles = result.by_source.remove(&source_key).unwrap_or_default();
        let total_available = articles.len();

        let limit = query.limit.filter(|l| *l > 0);
        if let Some(limit) = limit {
            articles.truncate(limit);
        }

        Ok(Json(SourceArticlesResponse {
            success: true,
            source: source_key,
            count: articles.len(),
            articles,
            total_available,
            metadata: SourceArticlesMetadata {
                search_keyword: filter.keyword,
                category: filter.category,
                applied_limit: limit,
                last_updated: result.last_updated,
                timestamp: Utc::now(),
            },
        }))
    }

    /// POST /api/articles/refresh - Run an aggregation now and wait for it
    pub async fn refresh(
        State(controller): State<Arc<ArticlesController>>,
    ) -> AppResult<Json<RefreshResponse>> {
        tracing::info!("Manual refresh triggered");
        let report = controller.aggregator.fetch_all_active_sources_once().await;

        let mut by_source: BTreeMap<String, usize> = controller
            .registry
            .keys()
            .into_iter()
            .map(|key| (key, 0))
            .collect();
        for run in &report.sources {
            by_source.insert(run.source_key.clone(), run.count);
        }

        let window = controller.aggregator.window();
        Ok(Json(RefreshResponse {
            success: true,
            message: "Articles refreshed successfully".to_string(),
            results: RefreshResults {
                by_source,
                total: report.total,
            },
            stored: report.stored,
            timestamp: Utc::now(),
            next_automatic_fetch: format!(
                "Scheduled randomly in {}-{} hours",
                window.min_hours, window.max_hours
            ),
        }))
    }

    /// GET /api/articles/stats - Corpus statistics
    pub async fn stats(
        State(controller): State<Arc<ArticlesController>>,
    ) -> AppResult<Json<StatsResponse>> {
        let result = controller
            .query_service
            .get_articles(&ArticleFilter::default())
            .await;

        let articles_by_source = result
            .by_source
            .iter()
            .map(|(key, articles)| {
                let mut categories: Vec<String> =
                    articles.iter().map(|s| s.article.category.clone()).collect();
                categories.sort();
                categories.dedup();

                let stats = SourceArticleStats {
                    count: articles.len(),
                    latest_article: articles.iter().map(|s| s.article.publish_date).max(),
                    categories,
                };
                (key.clone(), stats)
            })
            .collect();

        let mut category_counts: BTreeMap<String, usize> = BTreeMap::new();
        for scored in &result.ranked {
            *category_counts.entry(scored.article.category.clone()).or_default() += 1;
        }

        Ok(Json(StatsResponse {
            success: true,
            stats: ArticleStats {
                total_articles: result.total,
                articles_by_source,
                category_counts,
                available_categories: controller.query_service.categories(),
                last_updated: result.last_updated,
                system_health: SystemHealth {
                    data_origin: result.origin,
                    last_aggregation: controller.aggregator.last_aggregation(),
                },
            },
            timestamp: Utc::now(),
        }))
    }

    /// GET /api/articles/{articleId} - Single article
    pub async fn get_article(
        State(controller): State<Arc<ArticlesController>>,
        Path(article_id): Path<String>,
    ) -> AppResult<Json<ArticleResponse>> {
        let article = controller
            .query_service
            .find_article(&article_id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Article {}", article_id)))?;

        Ok(Json(ArticleResponse {
            success: true,
            metadata: ArticleMetadata {
                source: article.source_key.clone(),
                category: article.category.clone(),
                timestamp: Utc::now(),
            },
            article,
        }))
    }
}
