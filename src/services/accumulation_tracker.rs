//! Accumulation tracking: where cross-domain similarity piles up.
//!
//! Every similarity match becomes a directed edge. A belief that many
//! unrelated domains point at is a hotspot, a candidate general pattern.

use std::sync::Arc;
use tracing::instrument;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AccumulationHotspot, Connection, SimilarityEdge, SimilarityMatch};
use crate::domain::ports::SimilarityEdgeRepository;

/// Records similarity edges and aggregates them into hotspots.
pub struct AccumulationTracker {
    edges: Arc<dyn SimilarityEdgeRepository>,
}

impl AccumulationTracker {
    /// Tracker over the given edge repository.
    pub fn new(edges: Arc<dyn SimilarityEdgeRepository>) -> Self {
        Self { edges }
    }

    /// Record a directed similarity. Re-recording the same pair replaces it.
    #[instrument(skip(self), err)]
    pub async fn record_similarity(
        &self,
        source_id: &str,
        target_id: &str,
        similarity: f64,
        source_domain: &str,
        target_domain: &str,
    ) -> DomainResult<()> {
        validate_similarity(similarity)?;
        self.edges
            .upsert_edge(&SimilarityEdge::new(
                source_id,
                target_id,
                similarity,
                source_domain,
                target_domain,
            ))
            .await
    }

    /// Record one edge per match, all or nothing.
    #[instrument(skip(self, matches), fields(matches = matches.len()), err)]
    pub async fn record_matches(
        &self,
        source_id: &str,
        source_domain: &str,
        matches: &[SimilarityMatch],
    ) -> DomainResult<()> {
        let edges = matches
            .iter()
            .map(|m| {
                validate_similarity(m.similarity)?;
                Ok(SimilarityEdge::new(
                    source_id,
                    &m.belief_id,
                    m.similarity,
                    source_domain,
                    &m.domain,
                ))
            })
            .collect::<DomainResult<Vec<_>>>()?;

        self.edges.upsert_edges(&edges).await?;
        tracing::debug!(source_id, recorded = edges.len(), "recorded similarity edges");
        Ok(())
    }

    /// Edges touching `belief_id`, outgoing first.
    #[instrument(skip(self), err)]
    pub async fn get_connections(&self, belief_id: &str) -> DomainResult<Vec<Connection>> {
        self.edges.connections(belief_id).await
    }

    /// Targets reached from at least `min_domains` distinct source domains
    /// through at least `min_connections` edges.
    ///
    /// Broadest first, then most similar on average.
    #[instrument(skip(self), err)]
    pub async fn get_hotspots(
        &self,
        min_domains: u64,
        min_connections: u64,
    ) -> DomainResult<Vec<AccumulationHotspot>> {
        self.edges.hotspots(min_domains, min_connections).await
    }

    /// Delete every edge touching `belief_id`, returning how many were removed.
    #[instrument(skip(self), err)]
    pub async fn remove_edges(&self, belief_id: &str) -> DomainResult<u64> {
        self.edges.remove_edges(belief_id).await
    }

    /// Number of stored edges.
    #[instrument(skip(self), err)]
    pub async fn edge_count(&self) -> DomainResult<u64> {
        self.edges.edge_count().await
    }
}

fn validate_similarity(similarity: f64) -> DomainResult<()> {
    if similarity.is_finite() {
        Ok(())
    } else {
        Err(DomainError::ValidationFailed(format!(
            "Similarity must be a finite number, got {similarity}"
        )))
    }
}
