use crate::infrastructure::fetch::FetchError;

/// Failures inside one ingestion step. Never escapes the step that raised it:
/// callers turn it into an empty result or `None` and log it.
#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("feed parse error: {0}")]
    FeedParse(String),
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl From<feed_rs::parser::ParseFeedError> for IngestionError {
    fn from(err: feed_rs::parser::ParseFeedError) -> Self {
        IngestionError::FeedParse(err.to_string())
    }
}
