use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::errors::DomainResult;
use crate::domain::models::ObservationLifecycle;

/// Counts reported by [`ObservationIndex::stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationIndexStats {
    /// Reference edges.
    pub total_refs: u64,
    /// Distinct observations with at least one edge.
    pub unique_observations: u64,
    /// Observations marked pruned.
    pub pruned_count: u64,
}

/// Persisted ledger of observation references and pruned content.
///
/// Tracks two things that survive process restarts:
/// - which beliefs reference each observation (many-to-many)
/// - which observations have had their content deleted
///
/// Pruning never touches reference edges: beliefs keep their provenance
/// ids after the evidence bytes are gone.
#[async_trait]
pub trait ObservationIndex: Send + Sync {
    /// Record that `belief_id` references `observation_id`. Idempotent.
    async fn record_reference(&self, observation_id: &str, belief_id: &str) -> DomainResult<()>;

    /// Record every reference of a belief as one atomic unit. Idempotent.
    async fn record_references(
        &self,
        belief_id: &str,
        observation_ids: &[String],
    ) -> DomainResult<()>;

    /// Beliefs referencing an observation, in the order they were recorded.
    async fn referencing_beliefs(&self, observation_id: &str) -> DomainResult<Vec<String>>;

    /// Observations referenced by a belief, in the order they were recorded.
    async fn references_for_belief(&self, belief_id: &str) -> DomainResult<Vec<String>>;

    /// Flag an observation's content as deleted. One-way and idempotent:
    /// the first prune timestamp is kept.
    async fn mark_content_pruned(&self, observation_id: &str) -> DomainResult<()>;

    /// `true` unless the observation was marked pruned.
    ///
    /// An observation this index has never seen counts as available.
    async fn is_content_available(&self, observation_id: &str) -> DomainResult<bool>;

    /// When the observation content was pruned, if it was.
    async fn pruned_at(&self, observation_id: &str) -> DomainResult<Option<DateTime<Utc>>>;

    /// Every observation id marked pruned.
    async fn pruned_ids(&self) -> DomainResult<HashSet<String>>;

    /// Delete every edge where `belief_id` is the referencing side.
    ///
    /// Called when the belief is deleted. Returns the number of edges removed.
    async fn remove_references_for_belief(&self, belief_id: &str) -> DomainResult<u64>;

    async fn stats(&self) -> DomainResult<ObservationIndexStats>;

    /// Observations whose content is safe to delete now.
    ///
    /// This is `{incorporated in lifecycle} - {already pruned}`. Whether a
    /// belief still lists the id is irrelevant: belief reference lists
    /// outlive content.
    async fn get_prunable(&self, lifecycle: &ObservationLifecycle) -> DomainResult<HashSet<String>> {
        let incorporated = lifecycle.collectible();
        if incorporated.is_empty() {
            return Ok(HashSet::new());
        }

        let pruned = self.pruned_ids().await?;
        Ok(incorporated
            .into_iter()
            .filter(|id| !pruned.contains(id))
            .collect())
    }
}
