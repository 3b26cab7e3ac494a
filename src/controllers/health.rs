use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::ingestion::Aggregator;
use crate::infrastructure::db::{check_connection, DbPool};

/// Dependencies the readiness probe looks at
pub struct HealthState {
    pub pool: Arc<DbPool>,
    pub aggregator: Arc<Aggregator>,
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let last_aggregation = state.aggregator.last_aggregation();

    match check_connection(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "database": "connected",
                "last_aggregation": last_aggregation
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "not_ready",
                    "database": "disconnected",
                    "last_aggregation": last_aggregation
                })),
            )
        }
    }
}
