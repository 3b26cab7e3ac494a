pub mod discovery;
pub mod enricher;
pub mod error;
pub mod feed_reader;
pub mod orchestrator;
pub mod scheduler;
pub mod scraper;

pub use discovery::FeedDiscovery;
pub use enricher::{MetadataEnricher, PageMetadata};
pub use error::IngestionError;
pub use feed_reader::FeedReader;
pub use orchestrator::{SourceOrchestrator, SourceOutcome};
pub use scheduler::{AggregationReport, AggregationSettings, Aggregator, ScheduleWindow};
pub use scraper::PageScraper;

use crate::error::AppResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Process-wide bookkeeping that outlives a single run
#[async_trait]
pub trait SystemStore: Send + Sync {
    async fn save_last_fetch(&self, at: DateTime<Utc>) -> AppResult<()>;

    async fn load_last_fetch(&self) -> AppResult<Option<DateTime<Utc>>>;
}
