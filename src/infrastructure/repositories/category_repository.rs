use crate::infrastructure::db::DbPool;
use crate::{domain::category::CategoryStore, error::AppResult};
use async_trait::async_trait;
use std::sync::Arc;

pub struct CategoryRepository {
    pool: Arc<DbPool>,
}

impl CategoryRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for CategoryRepository {
    async fn load_dynamic(&self) -> AppResult<Vec<String>> {
        let pool = self.pool.as_ref();
        let labels = sqlx::query_scalar::<_, String>(
            r#"
            SELECT label
            FROM dynamic_categories
            ORDER BY label
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(labels)
    }

    async fn save_dynamic(&self, labels: &[String]) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            INSERT INTO dynamic_categories (label)
            SELECT UNNEST($1::text[])
            ON CONFLICT (label) DO NOTHING
            "#,
        )
        .bind(labels)
        .execute(pool)
        .await?;

        Ok(())
    }
}
