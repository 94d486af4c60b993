use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::Observation;

/// Storage for observation content.
///
/// Observations are immutable: storing an id that already exists keeps
/// the original. Deleting content is how garbage collection reclaims space.
#[async_trait]
pub trait EvidenceStore: Send + Sync {
    async fn put(&self, observation: &Observation) -> DomainResult<()>;

    async fn get(&self, id: &str) -> DomainResult<Option<Observation>>;

    /// Delete content, returning whether anything was stored under `id`.
    async fn delete(&self, id: &str) -> DomainResult<bool>;
}
