pub mod article;
pub mod category;
pub mod ingestion;
pub mod query;
pub mod source;
