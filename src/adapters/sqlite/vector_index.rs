//! Durable vector index backed by a SQLite BLOB column.
//!
//! Search is a full scan with cosine distance computed in Rust. Belief
//! counts in a single store stay small enough that this is not the
//! bottleneck.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::warn;

use super::format_datetime;
use crate::adapters::vector::{bytes_to_embedding, check_dimension, cosine_distance, embedding_to_bytes, nearest};
use crate::domain::errors::DomainResult;
use crate::domain::ports::{Neighbor, VectorIndex};

/// [`VectorIndex`] storing vectors of one fixed dimension in `belief_vectors`.
#[derive(Clone)]
pub struct SqliteVectorIndex {
    pool: SqlitePool,
    dimension: usize,
}

impl SqliteVectorIndex {
    /// Index over `pool` accepting vectors of length `dimension`.
    pub fn new(pool: SqlitePool, dimension: usize) -> Self {
        Self { pool, dimension }
    }
}

#[async_trait]
impl VectorIndex for SqliteVectorIndex {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn upsert(&self, key: &str, vector: &[f32]) -> DomainResult<()> {
        check_dimension(self.dimension, vector)?;

        sqlx::query(
            r#"INSERT INTO belief_vectors (key, dimension, embedding, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT(key) DO UPDATE SET
                   dimension = excluded.dimension,
                   embedding = excluded.embedding,
                   updated_at = excluded.updated_at"#,
        )
        .bind(key)
        .bind(self.dimension as i64)
        .bind(embedding_to_bytes(vector))
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM belief_vectors WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn knn(&self, vector: &[f32], k: usize) -> DomainResult<Vec<Neighbor>> {
        check_dimension(self.dimension, vector)?;
        if k == 0 {
            return Ok(Vec::new());
        }

        // Rows written under a different dimension are ignored rather than
        // compared as maximally distant.
        let rows: Vec<(String, i64, Vec<u8>)> =
            sqlx::query_as("SELECT key, dimension, embedding FROM belief_vectors")
                .fetch_all(&self.pool)
                .await?;

        let mut skipped = 0usize;
        let mut candidates = Vec::with_capacity(rows.len());
        for (key, dimension, bytes) in rows {
            if dimension != self.dimension as i64 {
                skipped += 1;
                continue;
            }
            let stored = bytes_to_embedding(&bytes)?;
            candidates.push(Neighbor {
                distance: cosine_distance(vector, &stored),
                key,
            });
        }

        if skipped > 0 {
            warn!(
                skipped,
                expected = self.dimension,
                "ignoring stored vectors with a different embedding dimension"
            );
        }

        Ok(nearest(candidates, k))
    }

    async fn count(&self) -> DomainResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM belief_vectors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
