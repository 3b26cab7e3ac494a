use crate::infrastructure::db::DbPool;
use crate::{
    domain::source::{FetchMethod, Source, SourceStore},
    error::AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub struct SourceRepository {
    pool: Arc<DbPool>,
}

impl SourceRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SourceStore for SourceRepository {
    async fn load_all(&self) -> AppResult<Vec<Source>> {
        let pool = self.pool.as_ref();
        let sources = sqlx::query_as::<_, Source>(
            r#"
            SELECT source_key, display_name, domain, listing_url, feed_url,
                   default_categories, is_active, fetch_count, error_count,
                   last_fetched_at, last_method
            FROM sources
            ORDER BY source_key
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(sources)
    }

    async fn insert_if_absent(&self, source: &Source) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            INSERT INTO sources (
                source_key, display_name, domain, listing_url, feed_url,
                default_categories, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(&source.source_key)
        .bind(&source.display_name)
        .bind(&source.domain)
        .bind(&source.listing_url)
        .bind(&source.feed_url)
        .bind(&source.default_categories)
        .bind(source.is_active)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn save_feed_url(&self, source_key: &str, feed_url: &str) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            UPDATE sources
            SET feed_url = $2, updated_at = NOW()
            WHERE source_key = $1
            "#,
        )
        .bind(source_key)
        .bind(feed_url)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn save_attempt(
        &self,
        source_key: &str,
        method: FetchMethod,
        success: bool,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        let pool = self.pool.as_ref();

        if success {
            sqlx::query(
                r#"
                UPDATE sources
                SET fetch_count = fetch_count + 1,
                    last_method = $2,
                    last_fetched_at = $3,
                    updated_at = NOW()
                WHERE source_key = $1
                "#,
            )
            .bind(source_key)
            .bind(method.to_string())
            .bind(at)
            .execute(pool)
            .await?;
        } else {
            sqlx::query(
                r#"
                UPDATE sources
                SET error_count = error_count + 1, updated_at = NOW()
                WHERE source_key = $1
                "#,
            )
            .bind(source_key)
            .execute(pool)
            .await?;
        }

        Ok(())
    }
}
