use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Belief, BeliefQuery, ConfidenceLevel};

/// Repository trait for belief persistence
///
/// Beliefs are stored whole: `put` replaces any previous version with
/// the same id. All listing methods return the most recently updated
/// beliefs first.
#[async_trait]
pub trait BeliefRepository: Send + Sync {
    /// Insert or replace a belief by id
    async fn put(&self, belief: &Belief) -> DomainResult<()>;

    /// Get a belief by id, `None` when absent
    async fn get(&self, id: &str) -> DomainResult<Option<Belief>>;

    /// Delete a belief by id
    ///
    /// # Returns
    /// * `Ok(true)` if a row was removed
    /// * `Ok(false)` if no belief had that id
    async fn delete(&self, id: &str) -> DomainResult<bool>;

    /// Filtered query; unset filters match everything
    async fn query(&self, query: BeliefQuery) -> DomainResult<Vec<Belief>>;

    /// Count stored beliefs
    async fn count(&self) -> DomainResult<u64>;

    /// All beliefs in a domain (exact match)
    async fn find_by_domain(&self, domain: &str) -> DomainResult<Vec<Belief>> {
        self.query(BeliefQuery::new().domain(domain)).await
    }

    /// Beliefs whose posterior confidence is at or above `min_confidence`
    async fn find_by_confidence(
        &self,
        min_confidence: ConfidenceLevel,
    ) -> DomainResult<Vec<Belief>> {
        self.query(BeliefQuery::new().min_confidence(min_confidence))
            .await
    }

    /// The `limit` most recently updated beliefs
    async fn find_recent(&self, limit: usize) -> DomainResult<Vec<Belief>> {
        self.query(BeliefQuery::new().limit(limit)).await
    }
}
