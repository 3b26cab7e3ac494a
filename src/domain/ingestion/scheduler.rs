use super::orchestrator::{SourceOrchestrator, SourceOutcome};
use super::SystemStore;
use crate::domain::article::{Article, ArticleStore, UpsertSummary};
use crate::domain::category::{Categorizer, CategoryStore};
use crate::domain::query::CacheSnapshot;
use crate::domain::source::{FetchMethod, SourceRegistry};
use crate::infrastructure::cache::ArticleCache;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Jitter window for the gap between two runs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleWindow {
    pub min_hours: f64,
    pub max_hours: f64,
}

impl Default for ScheduleWindow {
    fn default() -> Self {
        Self {
            min_hours: 10.0,
            max_hours: 16.0,
        }
    }
}

impl ScheduleWindow {
    /// Uniformly random delay in `[min_hours, max_hours)`
    pub fn next_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let hours = rng.random_range(self.min_hours..self.max_hours);
        Duration::from_secs_f64(hours * SECONDS_PER_HOUR)
    }
}

#[derive(Debug, Clone)]
pub struct AggregationSettings {
    pub inter_source_delay: Duration,
    pub window: ScheduleWindow,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceRunSummary {
    pub source_key: String,
    pub method: FetchMethod,
    pub count: usize,
}

/// What one full pass over the active sources produced
#[derive(Debug, Clone, Serialize)]
pub struct AggregationReport {
    pub sources: Vec<SourceRunSummary>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored: Option<UpsertSummary>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Drives full aggregation runs and the self-rescheduling loop.
///
/// At most one run is active at a time; manual triggers wait for the
/// current run instead of overlapping it.
pub struct Aggregator {
    registry: Arc<SourceRegistry>,
    orchestrator: Arc<SourceOrchestrator>,
    article_store: Arc<dyn ArticleStore>,
    category_store: Arc<dyn CategoryStore>,
    system_store: Arc<dyn SystemStore>,
    categorizer: Arc<Categorizer>,
    cache: ArticleCache,
    settings: AggregationSettings,
    run_lock: Mutex<()>,
    last_aggregation: RwLock<Option<DateTime<Utc>>>,
}

impl Aggregator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: Arc<SourceRegistry>,
        orchestrator: Arc<SourceOrchestrator>,
        article_store: Arc<dyn ArticleStore>,
        category_store: Arc<dyn CategoryStore>,
        system_store: Arc<dyn SystemStore>,
        categorizer: Arc<Categorizer>,
        cache: ArticleCache,
        settings: AggregationSettings,
    ) -> Self {
        Self {
            registry,
            orchestrator,
            article_store,
            category_store,
            system_store,
            categorizer,
            cache,
            settings,
            run_lock: Mutex::new(()),
            last_aggregation: RwLock::new(None),
        }
    }

    pub fn last_aggregation(&self) -> Option<DateTime<Utc>> {
        *self
            .last_aggregation
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn window(&self) -> ScheduleWindow {
        self.settings.window
    }

    /// Manual trigger; waits behind any run already in flight
    pub async fn fetch_all_active_sources_once(&self) -> AggregationReport {
        self.run_once().await
    }

    /// One full pass: every active source in order, then store, cache, timestamp
    pub async fn run_once(&self) -> AggregationReport {
        let _guard = self.run_lock.lock().await;
        let started_at = Utc::now();

        let sources = self.registry.list_active();
        tracing::info!(count = sources.len(), "Starting article aggregation");

        let mut outcomes: Vec<SourceOutcome> = Vec::with_capacity(sources.len());
        for (index, source) in sources.into_iter().enumerate() {
            if index > 0 && !self.settings.inter_source_delay.is_zero() {
                tokio::time::sleep(self.settings.inter_source_delay).await;
            }

            let key = source.source_key.clone();
            let orchestrator = self.orchestrator.clone();
            let handle = tokio::spawn(async move { orchestrator.fetch_source(&source).await });

            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(source_key = %key, error = %e, "Source processing aborted");
                    self.registry.mark_attempt(&key, FetchMethod::None, false).await;
                    SourceOutcome::empty(&key)
                }
            };
            outcomes.push(outcome);
        }

        let outcomes = dedupe_across_sources(outcomes);
        let all: Vec<Article> = outcomes.iter().flat_map(|o| o.articles.clone()).collect();

        let stored = if all.is_empty() {
            None
        } else {
            self.persist(&all).await
        };
        self.persist_categories().await;

        let finished_at = Utc::now();
        let sources: Vec<SourceRunSummary> = outcomes
            .iter()
            .map(|o| SourceRunSummary {
                source_key: o.source_key.clone(),
                method: o.method,
                count: o.articles.len(),
            })
            .collect();

        // every registered key gets a bucket, inactive ones stay empty
        let mut runs: Vec<(String, Vec<Article>)> = outcomes
            .into_iter()
            .map(|o| (o.source_key, o.articles))
            .collect();
        for key in self.registry.keys() {
            if !runs.iter().any(|(k, _)| *k == key) {
                runs.push((key, Vec::new()));
            }
        }
        let snapshot = CacheSnapshot::build(runs, finished_at);
        self.cache.put(snapshot).await;

        *self
            .last_aggregation
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(finished_at);
        if let Err(e) = self.system_store.save_last_fetch(finished_at).await {
            tracing::error!(error = %e, "Failed to record last aggregation time");
        }

        tracing::info!(total = all.len(), "Aggregation complete");

        AggregationReport {
            sources,
            total: all.len(),
            stored,
            started_at,
            finished_at,
        }
    }

    /// Run now, then keep re-running after a jittered delay until aborted
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                self.run_once().await;

                let delay = self.settings.window.next_delay(&mut rand::rng());
                let next_run = Utc::now()
                    + chrono::Duration::from_std(delay).unwrap_or_else(|_| chrono::Duration::zero());
                tracing::info!(
                    next_run = %next_run,
                    hours = delay.as_secs_f64() / SECONDS_PER_HOUR,
                    "Next aggregation scheduled"
                );

                tokio::time::sleep(delay).await;
            }
        })
    }

    async fn persist(&self, articles: &[Article]) -> Option<UpsertSummary> {
        match self.article_store.upsert(articles).await {
            Ok(summary) => {
                tracing::info!(
                    purged = summary.purged,
                    inserted = summary.inserted,
                    updated = summary.updated,
                    failed = summary.failed,
                    "Articles stored"
                );
                Some(summary)
            }
            Err(e) => {
                tracing::error!(error = %e, "Article storage failed");
                None
            }
        }
    }

    async fn persist_categories(&self) {
        let labels = self.categorizer.dynamic_labels();
        if labels.is_empty() {
            return;
        }
        if let Err(e) = self.category_store.save_dynamic(&labels).await {
            tracing::error!(error = %e, "Failed to persist dynamic categories");
        }
    }
}

/// Ids must be unique in the store; keep the first occurrence in run order
fn dedupe_across_sources(outcomes: Vec<SourceOutcome>) -> Vec<SourceOutcome> {
    let mut seen = HashSet::new();
    outcomes
        .into_iter()
        .map(|mut outcome| {
            outcome.articles.retain(|a| seen.insert(a.id.clone()));
            outcome
        })
        .collect()
}
