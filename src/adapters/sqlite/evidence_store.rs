//! SQLite storage for observation content.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::format_datetime;
use crate::domain::errors::DomainResult;
use crate::domain::models::Observation;
use crate::domain::ports::EvidenceStore;

#[derive(Clone)]
pub struct SqliteEvidenceStore {
    pool: SqlitePool,
}

impl SqliteEvidenceStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EvidenceStore for SqliteEvidenceStore {
    async fn put(&self, observation: &Observation) -> DomainResult<()> {
        let data = serde_json::to_string(observation)?;

        sqlx::query(
            "INSERT OR IGNORE INTO observations (id, timestamp, source, data) VALUES (?, ?, ?, ?)",
        )
        .bind(&observation.id)
        .bind(format_datetime(&observation.timestamp))
        .bind(&observation.source)
        .bind(&data)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: &str) -> DomainResult<Option<Observation>> {
        let data: Option<String> = sqlx::query_scalar("SELECT data FROM observations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(data.map(|d| serde_json::from_str(&d)).transpose()?)
    }

    async fn delete(&self, id: &str) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM observations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
