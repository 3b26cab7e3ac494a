pub mod relevance;
pub mod service;
pub mod snapshot;

pub use relevance::relevance_score;
pub use service::{ArticleFilter, ArticleQueryService, ArticlesResult, ResultOrigin, ScoredArticle};
pub use snapshot::{CacheSnapshot, SNAPSHOT_MAX_ARTICLES};
