pub mod request_id;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::controllers::{
    articles::ArticlesController,
    health::{self, HealthState},
    sources::SourcesController,
};
use crate::infrastructure::config::Config;

/// Build the application router with all routes and layers
pub fn build_router(
    articles_controller: Arc<ArticlesController>,
    sources_controller: Arc<SourcesController>,
    health_state: Arc<HealthState>,
) -> Router {
    let article_routes = Router::new()
        .route("/api/articles", get(ArticlesController::list_articles))
        .route("/api/articles/search", get(ArticlesController::search))
        .route("/api/articles/categories", get(ArticlesController::categories))
        .route("/api/articles/stats", get(ArticlesController::stats))
        .route("/api/articles/refresh", post(ArticlesController::refresh))
        .route(
            "/api/articles/source/:sourceKey",
            get(ArticlesController::by_source),
        )
        .route("/api/articles/:articleId", get(ArticlesController::get_article))
        .with_state(articles_controller);

    let source_routes = Router::new()
        .route("/api/sources", get(SourcesController::list_sources))
        .with_state(sources_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(health_state)
        .merge(article_routes)
        .merge(source_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve until ctrl-c
pub async fn start_http_server(config: Arc<Config>, app: Router) -> std::io::Result<()> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
