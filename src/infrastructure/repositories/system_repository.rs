use crate::infrastructure::db::DbPool;
use crate::{
    domain::ingestion::SystemStore,
    error::{AppError, AppResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

const LAST_FETCH_KEY: &str = "last_fetch";

/// Key/value settings in `system_config`
pub struct SystemRepository {
    pool: Arc<DbPool>,
}

impl SystemRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    pub async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let pool = self.pool.as_ref();
        let value = sqlx::query_scalar::<_, String>(
            r#"
            SELECT setting_value
            FROM system_config
            WHERE setting_key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(pool)
        .await?;

        Ok(value)
    }

    pub async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            INSERT INTO system_config (setting_key, setting_value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (setting_key) DO UPDATE SET
                setting_value = EXCLUDED.setting_value,
                updated_at = NOW()
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl SystemStore for SystemRepository {
    async fn save_last_fetch(&self, at: DateTime<Utc>) -> AppResult<()> {
        self.set(LAST_FETCH_KEY, &at.to_rfc3339()).await
    }

    async fn load_last_fetch(&self) -> AppResult<Option<DateTime<Utc>>> {
        let Some(raw) = self.get(LAST_FETCH_KEY).await? else {
            return Ok(None);
        };

        DateTime::parse_from_rfc3339(&raw)
            .map(|at| Some(at.with_timezone(&Utc)))
            .map_err(|e| AppError::Internal(format!("corrupt {LAST_FETCH_KEY} value {raw:?}: {e}")))
    }
}
