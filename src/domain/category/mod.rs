pub mod service;

pub use service::{Categorizer, DEFAULT_CATEGORY, PREDEFINED_CATEGORIES};

use crate::error::AppResult;
use async_trait::async_trait;

/// Persistence for dynamically discovered category labels
#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn load_dynamic(&self) -> AppResult<Vec<String>>;

    /// Append labels; existing ones are left untouched
    async fn save_dynamic(&self, labels: &[String]) -> AppResult<()>;
}
