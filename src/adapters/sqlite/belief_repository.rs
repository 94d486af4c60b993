//! SQLite implementation of the BeliefRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::format_datetime;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Belief, BeliefQuery};
use crate::domain::ports::BeliefRepository;

/// Beliefs stored as JSON documents plus the columns needed to filter them.
#[derive(Clone)]
pub struct SqliteBeliefRepository {
    pool: SqlitePool,
}

impl SqliteBeliefRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BeliefRepository for SqliteBeliefRepository {
    async fn put(&self, belief: &Belief) -> DomainResult<()> {
        let data = serde_json::to_string(belief)?;
        let confidence = belief.confidence();

        sqlx::query(
            r#"INSERT INTO beliefs (id, domain, topic, confidence, confidence_rank,
               created, updated, version, verified, data)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                   domain = excluded.domain,
                   topic = excluded.topic,
                   confidence = excluded.confidence,
                   confidence_rank = excluded.confidence_rank,
                   created = excluded.created,
                   updated = excluded.updated,
                   version = excluded.version,
                   verified = excluded.verified,
                   data = excluded.data"#,
        )
        .bind(&belief.id)
        .bind(&belief.domain)
        .bind(&belief.topic)
        .bind(confidence.as_str())
        .bind(confidence.rank())
        .bind(format_datetime(&belief.created))
        .bind(format_datetime(&belief.updated))
        .bind(belief.version as i64)
        .bind(belief.verified)
        .bind(&data)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: &str) -> DomainResult<Option<Belief>> {
        let row: Option<BeliefRow> = sqlx::query_as("SELECT id, data FROM beliefs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Belief::try_from).transpose()
    }

    async fn delete(&self, id: &str) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM beliefs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn query(&self, query: BeliefQuery) -> DomainResult<Vec<Belief>> {
        if query.limit == Some(0) {
            return Ok(Vec::new());
        }

        let mut sql = String::from("SELECT id, data FROM beliefs WHERE 1=1");
        let mut bindings: Vec<QueryArg> = Vec::new();

        if let Some(domain) = &query.domain {
            sql.push_str(" AND domain = ?");
            bindings.push(QueryArg::Text(domain.clone()));
        }
        if let Some(level) = query.min_confidence {
            sql.push_str(" AND confidence_rank >= ?");
            bindings.push(QueryArg::Int(level.rank()));
        }

        sql.push_str(" ORDER BY updated DESC, id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bindings.push(QueryArg::Int(i64::try_from(limit).unwrap_or(i64::MAX)));
        }

        let mut q = sqlx::query_as::<_, BeliefRow>(&sql);
        for arg in bindings {
            q = match arg {
                QueryArg::Text(s) => q.bind(s),
                QueryArg::Int(i) => q.bind(i),
            };
        }

        let rows = q.fetch_all(&self.pool).await?;
        rows.into_iter().map(Belief::try_from).collect()
    }

    async fn count(&self) -> DomainResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM beliefs")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

enum QueryArg {
    Text(String),
    Int(i64),
}

#[derive(sqlx::FromRow)]
struct BeliefRow {
    id: String,
    data: String,
}

impl TryFrom<BeliefRow> for Belief {
    type Error = DomainError;

    fn try_from(row: BeliefRow) -> Result<Self, Self::Error> {
        serde_json::from_str(&row.data).map_err(|e| {
            DomainError::SerializationError(format!("belief {}: {e}", row.id))
        })
    }
}
