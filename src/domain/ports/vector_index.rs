//! Vector search port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// A nearest-neighbor hit: the stored key and its cosine distance to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    /// Key the vector was stored under.
    pub key: String,
    /// Cosine distance in `[0, 2]`; 0 means identical direction.
    pub distance: f32,
}

/// Keyed vector storage with k-nearest-neighbor search.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Vector length accepted by this index.
    fn dimension(&self) -> usize;

    /// Insert or replace the vector stored under `key`.
    async fn upsert(&self, key: &str, vector: &[f32]) -> DomainResult<()>;

    /// Remove `key`, returning whether it was present.
    async fn remove(&self, key: &str) -> DomainResult<bool>;

    /// Up to `k` neighbors of `vector`, nearest first.
    async fn knn(&self, vector: &[f32], k: usize) -> DomainResult<Vec<Neighbor>>;

    /// Number of stored vectors.
    async fn count(&self) -> DomainResult<u64>;
}
