use axum::Router;
use std::sync::Arc;

use crate::controllers::{
    articles::ArticlesController, health::HealthState, sources::SourcesController,
};
use crate::domain::{
    category::{Categorizer, CategoryStore},
    ingestion::{
        AggregationSettings, Aggregator, FeedDiscovery, FeedReader, MetadataEnricher,
        PageScraper, SourceOrchestrator, SystemStore,
    },
    query::ArticleQueryService,
    source::{RegistryError, SourceRegistry},
};
use crate::infrastructure::{
    cache::ArticleCache,
    config::Config,
    db::DbPool,
    fetch::HttpFetcher,
    http::build_router,
    repositories::{ArticleRepository, CategoryRepository, SourceRepository, SystemRepository},
};

/// Fully wired service: HTTP routes plus the aggregation loop they share state with
pub struct Application {
    pub router: Router,
    pub aggregator: Arc<Aggregator>,
    pub registry: Arc<SourceRegistry>,
}

/// Instantiate repositories, domain services and controllers.
///
/// Fails only when the source registry can't be loaded or seeded.
pub async fn build_application(
    config: &Config,
    pool: Arc<DbPool>,
    fetcher: Arc<dyn HttpFetcher>,
) -> Result<Application, RegistryError> {
    // 1. Repositories
    tracing::info!("Instantiating repositories...");
    let source_repo = Arc::new(SourceRepository::new(pool.clone()));
    let article_repo = Arc::new(ArticleRepository::new(pool.clone()));
    let category_repo = Arc::new(CategoryRepository::new(pool.clone()));
    let system_repo = Arc::new(SystemRepository::new(pool.clone()));

    // 2. Learned state
    let registry = Arc::new(SourceRegistry::bootstrap(source_repo).await?);

    let dynamic = match category_repo.load_dynamic().await {
        Ok(labels) => labels,
        Err(e) => {
            tracing::warn!(error = %e, "Could not load dynamic categories, starting empty");
            Vec::new()
        }
    };
    tracing::info!(count = dynamic.len(), "Dynamic categories loaded");
    let categorizer = Arc::new(Categorizer::with_dynamic(dynamic));

    match system_repo.load_last_fetch().await {
        Ok(Some(at)) => tracing::info!(last_fetch = %at, "Previous aggregation found"),
        Ok(None) => tracing::info!("No previous aggregation recorded"),
        Err(e) => tracing::warn!(error = %e, "Could not read previous aggregation time"),
    }

    // 3. Services
    tracing::info!("Instantiating services...");
    let cache = ArticleCache::default();
    let orchestrator = Arc::new(SourceOrchestrator::new(
        registry.clone(),
        FeedDiscovery::new(fetcher.clone(), config.discovery_timeout()),
        FeedReader::new(fetcher.clone(), config.feed_timeout()),
        PageScraper::new(fetcher.clone(), config.scrape_timeout()),
        MetadataEnricher::new(
            fetcher,
            config.enrich_delay(),
            config.enrich_timeout(),
            config.enrich_enabled,
        ),
        categorizer.clone(),
        config.max_articles_per_source,
    ));
    let aggregator = Arc::new(Aggregator::new(
        registry.clone(),
        orchestrator,
        article_repo.clone(),
        category_repo,
        system_repo,
        categorizer.clone(),
        cache.clone(),
        AggregationSettings {
            inter_source_delay: config.inter_source_delay(),
            window: config.schedule_window(),
        },
    ));
    let query_service = Arc::new(ArticleQueryService::new(
        cache,
        article_repo,
        registry.clone(),
        categorizer,
    ));

    // 4. Controllers
    tracing::info!("Instantiating controllers...");
    let articles_controller = Arc::new(ArticlesController::new(
        query_service,
        aggregator.clone(),
        registry.clone(),
    ));
    let sources_controller = Arc::new(SourcesController::new(registry.clone()));
    let health_state = Arc::new(HealthState {
        pool,
        aggregator: aggregator.clone(),
    });

    Ok(Application {
        router: build_router(articles_controller, sources_controller, health_state),
        aggregator,
        registry,
    })
}
