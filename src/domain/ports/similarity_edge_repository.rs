use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{AccumulationHotspot, Connection, SimilarityEdge};

/// Repository trait for the directed similarity-edge table
///
/// Edges are keyed by `(source_id, target_id)`. Writing an existing key
/// replaces its similarity and domains (last write wins).
#[async_trait]
pub trait SimilarityEdgeRepository: Send + Sync {
    /// Insert or replace a single edge
    async fn upsert_edge(&self, edge: &SimilarityEdge) -> DomainResult<()>;

    /// Insert or replace several edges as one atomic unit
    async fn upsert_edges(&self, edges: &[SimilarityEdge]) -> DomainResult<()>;

    /// Fetch the edge stored under `(source_id, target_id)`
    async fn get_edge(&self, source_id: &str, target_id: &str)
        -> DomainResult<Option<SimilarityEdge>>;

    /// Outgoing then incoming neighbors of a belief
    async fn connections(&self, belief_id: &str) -> DomainResult<Vec<Connection>>;

    /// Aggregate incoming edges per target belief
    ///
    /// Keeps targets with at least `min_domains` distinct source domains and
    /// `min_connections` edges, ordered by domain count then average
    /// similarity, both descending.
    async fn hotspots(
        &self,
        min_domains: u64,
        min_connections: u64,
    ) -> DomainResult<Vec<AccumulationHotspot>>;

    /// Delete every edge where `belief_id` is source or target
    async fn remove_edges(&self, belief_id: &str) -> DomainResult<u64>;

    /// Total number of stored edges
    async fn edge_count(&self) -> DomainResult<u64>;
}
