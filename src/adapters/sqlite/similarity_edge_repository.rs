//! SQLite implementation of the SimilarityEdgeRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{format_datetime, parse_datetime};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AccumulationHotspot, Connection, EdgeDirection, SimilarityEdge};
use crate::domain::ports::SimilarityEdgeRepository;

const UPSERT_EDGE: &str = r#"INSERT OR REPLACE INTO similarity_edges
    (source_id, target_id, similarity, source_domain, target_domain, created)
    VALUES (?, ?, ?, ?, ?, ?)"#;

#[derive(Clone)]
pub struct SqliteSimilarityEdgeRepository {
    pool: SqlitePool,
}

impl SqliteSimilarityEdgeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SimilarityEdgeRepository for SqliteSimilarityEdgeRepository {
    async fn upsert_edge(&self, edge: &SimilarityEdge) -> DomainResult<()> {
        sqlx::query(UPSERT_EDGE)
            .bind(&edge.source_id)
            .bind(&edge.target_id)
            .bind(edge.similarity)
            .bind(&edge.source_domain)
            .bind(&edge.target_domain)
            .bind(format_datetime(&edge.created))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn upsert_edges(&self, edges: &[SimilarityEdge]) -> DomainResult<()> {
        if edges.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for edge in edges {
            sqlx::query(UPSERT_EDGE)
                .bind(&edge.source_id)
                .bind(&edge.target_id)
                .bind(edge.similarity)
                .bind(&edge.source_domain)
                .bind(&edge.target_domain)
                .bind(format_datetime(&edge.created))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn get_edge(&self, source_id: &str, target_id: &str) -> DomainResult<Option<SimilarityEdge>> {
        let row: Option<EdgeRow> = sqlx::query_as(
            r#"SELECT source_id, target_id, similarity, source_domain, target_domain, created
               FROM similarity_edges WHERE source_id = ? AND target_id = ?"#,
        )
        .bind(source_id)
        .bind(target_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SimilarityEdge::try_from).transpose()
    }

    async fn connections(&self, belief_id: &str) -> DomainResult<Vec<Connection>> {
        let rows: Vec<ConnectionRow> = sqlx::query_as(
            r#"SELECT other_id, other_domain, similarity, direction FROM (
                   SELECT target_id AS other_id, target_domain AS other_domain, similarity,
                          'outgoing' AS direction, 0 AS side, rowid AS seq
                   FROM similarity_edges WHERE source_id = ?
                   UNION ALL
                   SELECT source_id, source_domain, similarity,
                          'incoming', 1, rowid
                   FROM similarity_edges WHERE target_id = ?
               )
               ORDER BY side, seq"#,
        )
        .bind(belief_id)
        .bind(belief_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Connection::try_from).collect()
    }

    async fn hotspots(&self, min_domains: u64, min_connections: u64) -> DomainResult<Vec<AccumulationHotspot>> {
        let rows: Vec<HotspotRow> = sqlx::query_as(
            r#"SELECT target_id,
                      COUNT(DISTINCT source_domain) AS domain_count,
                      COUNT(*) AS connection_count,
                      AVG(similarity) AS avg_similarity
               FROM similarity_edges
               GROUP BY target_id
               HAVING domain_count >= ? AND connection_count >= ?
               ORDER BY domain_count DESC, avg_similarity DESC, target_id ASC"#,
        )
        .bind(i64::try_from(min_domains).unwrap_or(i64::MAX))
        .bind(i64::try_from(min_connections).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| AccumulationHotspot {
                belief_id: r.target_id,
                domain_count: r.domain_count as u64,
                connection_count: r.connection_count as u64,
                avg_similarity: r.avg_similarity,
            })
            .collect())
    }

    async fn remove_edges(&self, belief_id: &str) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM similarity_edges WHERE source_id = ? OR target_id = ?")
            .bind(belief_id)
            .bind(belief_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn edge_count(&self) -> DomainResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM similarity_edges")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

#[derive(sqlx::FromRow)]
struct EdgeRow {
    source_id: String,
    target_id: String,
    similarity: f64,
    source_domain: String,
    target_domain: String,
    created: String,
}

impl TryFrom<EdgeRow> for SimilarityEdge {
    type Error = DomainError;

    fn try_from(row: EdgeRow) -> Result<Self, Self::Error> {
        Ok(SimilarityEdge {
            created: parse_datetime(&row.created)?,
            source_id: row.source_id,
            target_id: row.target_id,
            similarity: row.similarity,
            source_domain: row.source_domain,
            target_domain: row.target_domain,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ConnectionRow {
    other_id: String,
    other_domain: String,
    similarity: f64,
    direction: String,
}

impl TryFrom<ConnectionRow> for Connection {
    type Error = DomainError;

    fn try_from(row: ConnectionRow) -> Result<Self, Self::Error> {
        let direction = match row.direction.as_str() {
            "outgoing" => EdgeDirection::Outgoing,
            "incoming" => EdgeDirection::Incoming,
            other => {
                return Err(DomainError::SerializationError(format!(
                    "Invalid edge direction: {other}"
                )))
            }
        };
        Ok(Connection {
            other_id: row.other_id,
            other_domain: row.other_domain,
            similarity: row.similarity,
            direction,
        })
    }
}

#[derive(sqlx::FromRow)]
struct HotspotRow {
    target_id: String,
    domain_count: i64,
    connection_count: i64,
    avg_similarity: f64,
}
