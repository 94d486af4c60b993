//! SQLite implementation of the ObservationIndex.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::collections::HashSet;

use super::{format_datetime, parse_datetime};
use crate::domain::errors::DomainResult;
use crate::domain::ports::{ObservationIndex, ObservationIndexStats};

#[derive(Clone)]
pub struct SqliteObservationIndex {
    pool: SqlitePool,
}

impl SqliteObservationIndex {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ObservationIndex for SqliteObservationIndex {
    async fn record_reference(&self, observation_id: &str, belief_id: &str) -> DomainResult<()> {
        sqlx::query("INSERT OR IGNORE INTO observation_refs (observation_id, belief_id) VALUES (?, ?)")
            .bind(observation_id)
            .bind(belief_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn record_references(&self, belief_id: &str, observation_ids: &[String]) -> DomainResult<()> {
        if observation_ids.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for observation_id in observation_ids {
            sqlx::query("INSERT OR IGNORE INTO observation_refs (observation_id, belief_id) VALUES (?, ?)")
                .bind(observation_id)
                .bind(belief_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn referencing_beliefs(&self, observation_id: &str) -> DomainResult<Vec<String>> {
        let ids: Vec<String> = sqlx::query_scalar("SELECT belief_id FROM observation_refs WHERE observation_id = ? ORDER BY rowid")
            .bind(observation_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn references_for_belief(&self, belief_id: &str) -> DomainResult<Vec<String>> {
        let ids: Vec<String> = sqlx::query_scalar("SELECT observation_id FROM observation_refs WHERE belief_id = ? ORDER BY rowid")
            .bind(belief_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn mark_content_pruned(&self, observation_id: &str) -> DomainResult<()> {
        sqlx::query("INSERT OR IGNORE INTO observation_pruned (observation_id, pruned_at) VALUES (?, ?)")
            .bind(observation_id)
            .bind(format_datetime(&Utc::now()))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn is_content_available(&self, observation_id: &str) -> DomainResult<bool> {
        Ok(self.pruned_at(observation_id).await?.is_none())
    }

    async fn pruned_at(&self, observation_id: &str) -> DomainResult<Option<DateTime<Utc>>> {
        let raw: Option<String> = sqlx::query_scalar("SELECT pruned_at FROM observation_pruned WHERE observation_id = ?")
            .bind(observation_id)
            .fetch_optional(&self.pool)
            .await?;
        raw.as_deref().map(parse_datetime).transpose()
    }

    async fn pruned_ids(&self) -> DomainResult<HashSet<String>> {
        let ids: Vec<String> = sqlx::query_scalar("SELECT observation_id FROM observation_pruned")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.into_iter().collect())
    }

    async fn remove_references_for_belief(&self, belief_id: &str) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM observation_refs WHERE belief_id = ?")
            .bind(belief_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn stats(&self) -> DomainResult<ObservationIndexStats> {
        let (total_refs, unique_observations): (i64, i64) =
            sqlx::query_as("SELECT COUNT(*), COUNT(DISTINCT observation_id) FROM observation_refs")
                .fetch_one(&self.pool)
                .await?;
        let pruned_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM observation_pruned")
            .fetch_one(&self.pool)
            .await?;

        Ok(ObservationIndexStats {
            total_refs: total_refs as u64,
            unique_observations: unique_observations as u64,
            pruned_count: pruned_count as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;
    use crate::domain::models::ObservationLifecycle;

    async fn setup_test_index() -> SqliteObservationIndex {
        SqliteObservationIndex::new(create_migrated_test_pool().await.unwrap())
    }

    #[tokio::test]
    async fn test_references_both_directions() {
        let index = setup_test_index().await;
        index.record_reference("obs-1", "comp-a").await.unwrap();
        index.record_reference("obs-1", "comp-b").await.unwrap();
        index.record_reference("obs-2", "comp-a").await.unwrap();

        assert_eq!(index.referencing_beliefs("obs-1").await.unwrap(), vec!["comp-a", "comp-b"]);
        assert_eq!(index.references_for_belief("comp-a").await.unwrap(), vec!["obs-1", "obs-2"]);
        assert!(index.referencing_beliefs("obs-unknown").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_record_reference_is_idempotent() {
        let index = setup_test_index().await;
        index.record_reference("obs-1", "comp-a").await.unwrap();
        index.record_reference("obs-1", "comp-a").await.unwrap();
        index
            .record_references("comp-a", &["obs-1".to_string(), "obs-2".to_string()])
            .await
            .unwrap();

        let stats = index.stats().await.unwrap();
        assert_eq!(stats.total_refs, 2);
        assert_eq!(stats.unique_observations, 2);
    }

    #[tokio::test]
    async fn test_prune_marker_keeps_references() {
        let index = setup_test_index().await;
        index.record_reference("obs-1", "comp-a").await.unwrap();
        assert!(index.is_content_available("obs-1").await.unwrap());

        index.mark_content_pruned("obs-1").await.unwrap();
        let first = index.pruned_at("obs-1").await.unwrap().unwrap();
        index.mark_content_pruned("obs-1").await.unwrap();

        assert!(!index.is_content_available("obs-1").await.unwrap());
        assert_eq!(index.pruned_at("obs-1").await.unwrap(), Some(first));
        assert_eq!(index.referencing_beliefs("obs-1").await.unwrap(), vec!["comp-a"]);
        assert_eq!(index.stats().await.unwrap().pruned_count, 1);
    }

    #[tokio::test]
    async fn test_unknown_observation_is_available() {
        let index = setup_test_index().await;
        assert!(index.is_content_available("obs-never-seen").await.unwrap());
        assert!(index.pruned_at("obs-never-seen").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_prunable_excludes_pending_and_pruned() {
        let index = setup_test_index().await;
        let mut lifecycle = ObservationLifecycle::new();
        lifecycle.register("obs-pending");
        lifecycle.mark_incorporated("obs-done");
        lifecycle.mark_incorporated("obs-gone");
        index.mark_content_pruned("obs-gone").await.unwrap();

        let prunable = index.get_prunable(&lifecycle).await.unwrap();
        assert_eq!(prunable, HashSet::from(["obs-done".to_string()]));
    }

    #[tokio::test]
    async fn test_remove_references_for_belief() {
        let index = setup_test_index().await;
        index
            .record_references("comp-a", &["obs-1".to_string(), "obs-2".to_string()])
            .await
            .unwrap();
        index.record_reference("obs-1", "comp-b").await.unwrap();

        assert_eq!(index.remove_references_for_belief("comp-a").await.unwrap(), 2);
        assert_eq!(index.referencing_beliefs("obs-1").await.unwrap(), vec!["comp-b"]);
        assert!(index.references_for_belief("comp-a").await.unwrap().is_empty());
    }
}
