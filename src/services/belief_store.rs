//! Belief store: one entry point over beliefs, evidence, references and
//! the similarity graph.
//!
//! Keeps the derived records consistent with the beliefs they describe:
//! saving a belief records its observation references and refreshes its
//! vector, deleting one removes its references, edges and vector before
//! the belief itself.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::adapters::embeddings::HashingEmbeddingProvider;
use crate::adapters::sqlite::{
    initialize_database, PoolConfig, SqliteBeliefRepository, SqliteEvidenceStore,
    SqliteObservationIndex, SqliteSimilarityEdgeRepository, SqliteVectorIndex,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AccumulationConfig, AccumulationHotspot, Belief, BeliefQuery, ConfidenceLevel, Config,
    Connection, EvidenceType, LifecycleStats, Observation, ObservationLifecycle,
    ObservationState, SimilarityConfig, SimilarityMatch,
};
use crate::domain::ports::{
    BeliefRepository, EmbeddingProvider, EvidenceStore, ObservationIndex,
    SimilarityEdgeRepository, VectorIndex,
};

use super::accumulation_tracker::AccumulationTracker;
use super::bayesian_update::bayesian_update;
use super::similarity_finder::SimilarityFinder;

/// Outcome of a garbage-collection pass over observation content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneReport {
    /// Observations whose stored content was deleted.
    pub pruned: usize,
    /// Prunable observations with no stored content to delete.
    pub already_absent: usize,
}

impl PruneReport {
    /// Observations handled by the pass, whether or not content was stored.
    pub fn total(&self) -> usize {
        self.pruned + self.already_absent
    }
}

/// Record counts across the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    /// Stored beliefs.
    pub belief_count: u64,
    /// Observation to belief reference edges.
    pub observation_refs: u64,
    /// Distinct observations with at least one reference.
    pub unique_observations: u64,
    /// Observations whose content has been pruned.
    pub pruned_observations: u64,
    /// Directed similarity edges.
    pub similarity_edges: u64,
    /// Stored belief vectors.
    pub indexed_vectors: u64,
}

/// The individual collaborators a [`BeliefStore`] is built from.
#[allow(missing_docs)]
pub struct BeliefStoreParts {
    pub beliefs: Arc<dyn BeliefRepository>,
    pub references: Arc<dyn ObservationIndex>,
    pub evidence: Arc<dyn EvidenceStore>,
    pub edges: Arc<dyn SimilarityEdgeRepository>,
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub vectors: Arc<dyn VectorIndex>,
}

/// Beliefs, their evidence and the similarity graph behind one API.
pub struct BeliefStore {
    beliefs: Arc<dyn BeliefRepository>,
    references: Arc<dyn ObservationIndex>,
    evidence: Arc<dyn EvidenceStore>,
    vectors: Arc<dyn VectorIndex>,
    finder: SimilarityFinder,
    accumulation: AccumulationTracker,
    lifecycle: Mutex<ObservationLifecycle>,
    similarity: SimilarityConfig,
    hotspot_thresholds: AccumulationConfig,
}

impl BeliefStore {
    /// Build a store from explicit collaborators.
    pub fn new(parts: BeliefStoreParts, config: &Config) -> Self {
        let finder = SimilarityFinder::new(parts.embedder, parts.vectors.clone(), parts.beliefs.clone())
            .with_overfetch_factor(config.similarity.overfetch_factor);

        Self {
            beliefs: parts.beliefs,
            references: parts.references,
            evidence: parts.evidence,
            vectors: parts.vectors,
            finder,
            accumulation: AccumulationTracker::new(parts.edges),
            lifecycle: Mutex::new(ObservationLifecycle::new()),
            similarity: config.similarity.clone(),
            hotspot_thresholds: config.accumulation.clone(),
        }
    }

    /// Wire the SQLite adapters and the hashing embedder over an existing pool.
    ///
    /// The pool must already be migrated.
    pub fn from_pool(pool: SqlitePool, config: &Config) -> Self {
        let dimension = config.embedding.dimension;
        let parts = BeliefStoreParts {
            beliefs: Arc::new(SqliteBeliefRepository::new(pool.clone())),
            references: Arc::new(SqliteObservationIndex::new(pool.clone())),
            evidence: Arc::new(SqliteEvidenceStore::new(pool.clone())),
            edges: Arc::new(SqliteSimilarityEdgeRepository::new(pool.clone())),
            embedder: Arc::new(HashingEmbeddingProvider::new(dimension)),
            vectors: Arc::new(SqliteVectorIndex::new(pool, dimension)),
        };
        Self::new(parts, config)
    }

    /// Open (creating and migrating if needed) the configured database.
    pub async fn open(config: &Config) -> DomainResult<Self> {
        let url = config.database.url();
        let pool = initialize_database(&url, Some(PoolConfig::from(&config.database))).await?;
        info!(path = %config.database.path, "belief store opened");
        Ok(Self::from_pool(pool, config))
    }

    // ---- beliefs ----

    /// Validate and store a belief, its observation references and its vector.
    #[instrument(skip(self, belief), fields(belief_id = %belief.id, version = belief.version), err)]
    pub async fn save(&self, belief: &Belief) -> DomainResult<()> {
        belief.validate().map_err(DomainError::ValidationFailed)?;

        self.beliefs.put(belief).await?;
        self.references.record_references(&belief.id, &belief.observations).await?;
        self.finder.index(belief).await?;

        debug!("belief saved");
        Ok(())
    }

    /// Current version of a belief.
    #[instrument(skip(self), err)]
    pub async fn get(&self, id: &str) -> DomainResult<Option<Belief>> {
        self.beliefs.get(id).await
    }

    /// Beliefs matching `query`, most recently updated first.
    #[instrument(skip(self), err)]
    pub async fn find(&self, query: BeliefQuery) -> DomainResult<Vec<Belief>> {
        self.beliefs.query(query).await
    }

    /// Beliefs in `domain`.
    #[instrument(skip(self), err)]
    pub async fn find_by_domain(&self, domain: &str) -> DomainResult<Vec<Belief>> {
        self.beliefs.find_by_domain(domain).await
    }

    /// Beliefs at or above `min_confidence`.
    #[instrument(skip(self), err)]
    pub async fn find_by_confidence(&self, min_confidence: ConfidenceLevel) -> DomainResult<Vec<Belief>> {
        self.beliefs.find_by_confidence(min_confidence).await
    }

    /// The `limit` most recently updated beliefs.
    #[instrument(skip(self), err)]
    pub async fn find_recent(&self, limit: usize) -> DomainResult<Vec<Belief>> {
        self.beliefs.find_recent(limit).await
    }

    /// Delete a belief and everything derived from it.
    ///
    /// Observation content is left alone; it is reclaimed by
    /// [`prune_observations`](Self::prune_observations).
    #[instrument(skip(self), fields(belief_id = id), err)]
    pub async fn delete(&self, id: &str) -> DomainResult<bool> {
        let refs = self.references.remove_references_for_belief(id).await?;
        let edges = self.accumulation.remove_edges(id).await?;
        self.finder.remove_index(id).await?;
        let removed = self.beliefs.delete(id).await?;

        if removed {
            info!(refs, edges, "belief deleted");
        }
        Ok(removed)
    }

    // ---- observations ----

    /// Store observation content and start tracking it as pending.
    ///
    /// An id whose content was already pruned is refused with
    /// [`DomainError::ValidationFailed`]: the pruned marker is permanent,
    /// so stored bytes would never be reported or reclaimed again.
    #[instrument(skip(self, observation), fields(observation_id = %observation.id), err)]
    pub async fn record_observation(&self, observation: &Observation) -> DomainResult<()> {
        observation.validate().map_err(DomainError::ValidationFailed)?;

        let mut lifecycle = self.lifecycle.lock().await;
        if !self.references.is_content_available(&observation.id).await? {
            warn!("observation content was already pruned, not storing it again");
            return Err(DomainError::ValidationFailed(format!(
                "Observation {} was already pruned",
                observation.id
            )));
        }

        self.evidence.put(observation).await?;
        lifecycle.register(&observation.id);
        Ok(())
    }

    /// Stored content of an observation, `None` once pruned.
    #[instrument(skip(self), err)]
    pub async fn get_observation(&self, id: &str) -> DomainResult<Option<Observation>> {
        self.evidence.get(id).await
    }

    /// Apply an observation to a stored belief and persist the result.
    ///
    /// Re-incorporating an observation the belief already lists returns
    /// the stored belief without writing anything. An observation whose
    /// content was already pruned is still applied but not tracked again.
    #[instrument(skip(self, observation, new_statement, reasoning), fields(observation_id = %observation.id), err)]
    pub async fn incorporate(
        &self,
        belief_id: &str,
        observation: &Observation,
        evidence: EvidenceType,
        new_statement: Option<&str>,
        reasoning: Option<&str>,
    ) -> DomainResult<Belief> {
        let current = self
            .beliefs
            .get(belief_id)
            .await?
            .ok_or_else(|| DomainError::BeliefNotFound(belief_id.to_string()))?;

        let updated = bayesian_update(observation, &current, evidence, new_statement, reasoning)?;
        if updated.version != current.version {
            self.save(&updated).await?;
        }

        let mut lifecycle = self.lifecycle.lock().await;
        if self.references.is_content_available(&observation.id).await? {
            lifecycle.mark_incorporated(&observation.id);
        } else {
            debug!("observation already pruned, not tracking it");
        }
        Ok(updated)
    }

    /// Lifecycle state of a tracked observation.
    pub async fn observation_state(&self, observation_id: &str) -> DomainResult<ObservationState> {
        self.lifecycle.lock().await.get_state(observation_id)
    }

    /// Counts from the in-process lifecycle tracker.
    pub async fn lifecycle_stats(&self) -> LifecycleStats {
        self.lifecycle.lock().await.stats()
    }

    /// Beliefs that used an observation.
    #[instrument(skip(self), err)]
    pub async fn referencing_beliefs(&self, observation_id: &str) -> DomainResult<Vec<String>> {
        self.references.referencing_beliefs(observation_id).await
    }

    /// Observations a belief used.
    #[instrument(skip(self), err)]
    pub async fn references_for_belief(&self, belief_id: &str) -> DomainResult<Vec<String>> {
        self.references.references_for_belief(belief_id).await
    }

    /// False once an observation's content has been pruned.
    #[instrument(skip(self), err)]
    pub async fn is_content_available(&self, observation_id: &str) -> DomainResult<bool> {
        self.references.is_content_available(observation_id).await
    }

    /// Incorporated observations whose content has not been pruned yet.
    #[instrument(skip(self), err)]
    pub async fn prunable_observations(&self) -> DomainResult<HashSet<String>> {
        let lifecycle = self.lifecycle.lock().await;
        self.references.get_prunable(&lifecycle).await
    }

    /// Delete the content of every incorporated, not yet pruned observation.
    ///
    /// References are kept: beliefs still list every observation id they
    /// used. The lifecycle lock is held for the whole pass.
    ///
    /// Each id is marked pruned before its content is deleted, so a failed
    /// pass never leaves an id reported available without content. Ids
    /// left marked but still tracked by a failed pass are finished on the
    /// next one.
    #[instrument(skip(self), err)]
    pub async fn prune_observations(&self) -> DomainResult<PruneReport> {
        let mut lifecycle = self.lifecycle.lock().await;
        let mut prunable: Vec<String> = self.references.get_prunable(&lifecycle).await?.into_iter().collect();
        prunable.sort();

        let mut report = PruneReport::default();
        for observation_id in &prunable {
            self.references.mark_content_pruned(observation_id).await?;
            if self.evidence.delete(observation_id).await? {
                report.pruned += 1;
            } else {
                report.already_absent += 1;
            }
            lifecycle.collect(observation_id);
        }

        let pruned_ids = self.references.pruned_ids().await?;
        let mut interrupted: Vec<String> = lifecycle.collectible().intersection(&pruned_ids).cloned().collect();
        interrupted.sort();
        for observation_id in &interrupted {
            if self.evidence.delete(observation_id).await? {
                warn!(observation_id = %observation_id, "deleted content left behind by an interrupted prune");
            }
            lifecycle.collect(observation_id);
        }

        if report.total() > 0 {
            info!(
                pruned = report.pruned,
                already_absent = report.already_absent,
                "observation content pruned"
            );
        }
        Ok(report)
    }

    // ---- convergence ----

    /// Cross-domain beliefs resembling `belief_id`, recorded as similarity edges.
    ///
    /// `None` arguments fall back to the configured defaults. An unknown id
    /// yields no matches.
    #[instrument(skip(self), err)]
    pub async fn reminds_me_of(
        &self,
        belief_id: &str,
        limit: Option<usize>,
        min_similarity: Option<f64>,
    ) -> DomainResult<Vec<SimilarityMatch>> {
        let Some(belief) = self.beliefs.get(belief_id).await? else {
            return Ok(Vec::new());
        };

        let matches = self
            .finder
            .reminds_me_of(
                &belief,
                limit.unwrap_or(self.similarity.default_limit),
                min_similarity.unwrap_or(self.similarity.min_similarity),
            )
            .await?;

        self.accumulation.record_matches(&belief.id, &belief.domain, &matches).await?;
        Ok(matches)
    }

    /// Similarity edges touching a belief, outgoing first.
    #[instrument(skip(self), err)]
    pub async fn connections(&self, belief_id: &str) -> DomainResult<Vec<Connection>> {
        self.accumulation.get_connections(belief_id).await
    }

    /// Beliefs reached from at least `min_domains` domains through at least
    /// `min_connections` edges.
    #[instrument(skip(self), err)]
    pub async fn hotspots(&self, min_domains: u64, min_connections: u64) -> DomainResult<Vec<AccumulationHotspot>> {
        self.accumulation.get_hotspots(min_domains, min_connections).await
    }

    /// Hotspots using the configured thresholds.
    pub async fn default_hotspots(&self) -> DomainResult<Vec<AccumulationHotspot>> {
        self.hotspots(self.hotspot_thresholds.min_domains, self.hotspot_thresholds.min_connections)
            .await
    }

    /// The underlying accumulation tracker.
    pub fn accumulation(&self) -> &AccumulationTracker {
        &self.accumulation
    }

    /// The underlying similarity finder.
    pub fn finder(&self) -> &SimilarityFinder {
        &self.finder
    }

    /// Record counts across the store.
    #[instrument(skip(self), err)]
    pub async fn stats(&self) -> DomainResult<StoreStats> {
        let index = self.references.stats().await?;
        Ok(StoreStats {
            belief_count: self.beliefs.count().await?,
            observation_refs: index.total_refs,
            unique_observations: index.unique_observations,
            pruned_observations: index.pruned_count,
            similarity_edges: self.accumulation.edge_count().await?,
            indexed_vectors: self.vectors.count().await?,
        })
    }
}
