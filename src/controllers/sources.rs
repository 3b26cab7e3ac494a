use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    domain::source::{SourceRegistry, SourceStats},
    error::AppResult,
};

#[derive(Debug, Serialize)]
pub struct SourcesResponse {
    pub success: bool,
    pub sources: Vec<SourceStats>,
    pub count: usize,
}

pub struct SourcesController {
    registry: Arc<SourceRegistry>,
}

impl SourcesController {
    pub fn new(registry: Arc<SourceRegistry>) -> Self {
        Self { registry }
    }

    /// GET /api/sources - Per-source fetch statistics
    pub async fn list_sources(
        State(controller): State<Arc<SourcesController>>,
    ) -> AppResult<Json<SourcesResponse>> {
        let sources = controller.registry.stats();
        Ok(Json(SourcesResponse {
            success: true,
            count: sources.len(),
            sources,
        }))
    }
}
