//! Embedding provider port for semantic vector generation.
//!
//! How a provider turns text into a vector is its own business; the
//! core only relies on fixed-length, unit-normalized output.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name (e.g., "hashing").
    fn name(&self) -> &'static str;

    /// Embedding dimension for this provider/model.
    fn dimension(&self) -> usize;

    /// Generate a unit-length embedding for a single text.
    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>>;
}
