pub mod model;
pub mod store;

pub use model::{truncate_summary, Article, RawArticle, SUMMARY_MAX_CHARS};
pub use store::{ArticleStore, UpsertSummary, RETENTION_DAYS};
