use crate::infrastructure::db::DbPool;
use crate::{
    domain::article::{Article, ArticleStore, UpsertSummary, RETENTION_DAYS},
    error::AppResult,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;

pub struct ArticleRepository {
    pool: Arc<DbPool>,
}

impl ArticleRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Delete everything published before the retention cutoff
    pub async fn purge_expired(&self) -> AppResult<u64> {
        let pool = self.pool.as_ref();
        let cutoff = Utc::now() - Duration::days(RETENTION_DAYS);

        let result = sqlx::query(
            r#"
            DELETE FROM articles
            WHERE publish_date < $1
            "#,
        )
        .bind(cutoff)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Insert or refresh one article. Returns true when the row is new.
    ///
    /// On conflict only the mutable fields change; publish date, link and
    /// source stay as first recorded.
    pub async fn upsert_one(&self, article: &Article) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let inserted = sqlx::query_scalar::<_, bool>(
            r#"
            INSERT INTO articles (
                id, title, summary, link, author, publish_date,
                source_key, source_name, featured_image, category, fetched_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                summary = EXCLUDED.summary,
                featured_image = EXCLUDED.featured_image,
                category = EXCLUDED.category,
                fetched_at = EXCLUDED.fetched_at,
                updated_at = NOW()
            RETURNING (xmax = 0)
            "#,
        )
        .bind(&article.id)
        .bind(&article.title)
        .bind(&article.summary)
        .bind(&article.link)
        .bind(&article.author)
        .bind(article.publish_date)
        .bind(&article.source_key)
        .bind(&article.source_name)
        .bind(&article.featured_image)
        .bind(&article.category)
        .bind(article.fetched_at)
        .fetch_one(pool)
        .await?;

        Ok(inserted)
    }

    pub async fn find_by_id(&self, article_id: &str) -> AppResult<Option<Article>> {
        let pool = self.pool.as_ref();
        let article = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, summary, link, author, publish_date,
                   source_key, source_name, featured_image, category, fetched_at
            FROM articles
            WHERE id = $1
            "#,
        )
        .bind(article_id)
        .fetch_optional(pool)
        .await?;

        Ok(article)
    }
}

#[async_trait]
impl ArticleStore for ArticleRepository {
    async fn upsert(&self, articles: &[Article]) -> AppResult<UpsertSummary> {
        let mut summary = UpsertSummary {
            purged: self.purge_expired().await?,
            ..Default::default()
        };

        for article in articles {
            match self.upsert_one(article).await {
                Ok(true) => summary.inserted += 1,
                Ok(false) => summary.updated += 1,
                Err(e) => {
                    tracing::error!(
                        article_id = %article.id,
                        source_key = %article.source_key,
                        error = %e,
                        "Failed to store article"
                    );
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }

    async fn find_recent(&self) -> AppResult<Vec<Article>> {
        let pool = self.pool.as_ref();
        let cutoff = Utc::now() - Duration::days(RETENTION_DAYS);

        let articles = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, summary, link, author, publish_date,
                   source_key, source_name, featured_image, category, fetched_at
            FROM articles
            WHERE publish_date >= $1
            ORDER BY publish_date DESC
            "#,
        )
        .bind(cutoff)
        .fetch_all(pool)
        .await?;

        Ok(articles)
    }
}
