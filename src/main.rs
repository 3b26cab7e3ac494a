use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use healthwire::app::build_application;
use healthwire::infrastructure::config::{Config, LogFormat};
use healthwire::infrastructure::db::{check_connection, create_pool};
use healthwire::infrastructure::fetch::ReqwestFetcher;
use healthwire::infrastructure::http::start_http_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        environment = ?config.environment,
        "Starting Healthwire on {}:{}",
        config.host,
        config.port
    );

    // Create database connection pool
    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Database connection pool created");

    // Verify database connection
    check_connection(&pool).await?;
    tracing::info!("Database connection verified");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    let fetcher = Arc::new(ReqwestFetcher::new(&config.fetch_user_agent)?);
    let pool = Arc::new(pool);
    let config = Arc::new(config);

    let app = build_application(&config, pool, fetcher).await?;
    tracing::info!(sources = ?app.registry.keys(), "Source registry ready");

    // First run starts immediately, then reschedules itself
    let scheduler = app.aggregator.clone().spawn();

    let result = start_http_server(config, app.router).await;

    scheduler.abort();
    result.map_err(Into::into)
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "healthwire=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "healthwire=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
