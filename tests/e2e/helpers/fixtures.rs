use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use healthwire::domain::article::Article;
use sqlx::PgPool;

pub struct TestFixtures {
    pool: PgPool,
}

impl TestFixtures {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// An unsaved article for a seeded source, published `age` ago
    pub fn article(&self, id: &str, source_key: &str, title: &str, age: Duration) -> Article {
        let now = Utc::now();
        Article {
            id: id.to_string(),
            title: title.to_string(),
            summary: format!("{} summary", title),
            link: format!("https://{}.example.com/{}", source_key, id),
            author: None,
            publish_date: now - age,
            source_key: source_key.to_string(),
            source_name: format!("{} display", source_key),
            featured_image: None,
            category: "General Health".to_string(),
            fetched_at: now,
        }
    }

    pub async fn insert_article(&self, article: &Article) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO articles (
                id, title, summary, link, author, publish_date,
                source_key, source_name, featured_image, category, fetched_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
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
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn count_articles(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM articles")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    pub async fn get_article_title(&self, id: &str) -> Result<Option<String>> {
        let title = sqlx::query_scalar::<_, String>("SELECT title FROM articles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(title)
    }

    /// (fetch_count, error_count, last_method, feed_url) as persisted
    pub async fn get_source_counters(
        &self,
        source_key: &str,
    ) -> Result<(i32, i32, String, Option<String>)> {
        let row = sqlx::query_as::<_, (i32, i32, String, Option<String>)>(
            r#"
            SELECT fetch_count, error_count, last_method, feed_url
            FROM sources
            WHERE source_key = $1
            "#,
        )
        .bind(source_key)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    #[allow(dead_code)]
    pub async fn get_dynamic_categories(&self) -> Result<Vec<String>> {
        let labels =
            sqlx::query_scalar::<_, String>("SELECT label FROM dynamic_categories ORDER BY label")
                .fetch_all(&self.pool)
                .await?;
        Ok(labels)
    }

    pub async fn get_last_fetch(&self) -> Result<Option<DateTime<Utc>>> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT setting_value FROM system_config WHERE setting_key = 'last_fetch'",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(match value {
            Some(raw) => Some(DateTime::parse_from_rfc3339(&raw)?.with_timezone(&Utc)),
            None => None,
        })
    }
}
