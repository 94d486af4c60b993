//! Domain errors for the comprehension belief store.

use thiserror::Error;

/// Domain-level errors that can occur while updating, storing or
/// comparing beliefs.
///
/// A candidate vector whose belief no longer exists is deliberately not
/// represented here: similarity search skips such candidates.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Contradicting evidence was supplied without a revised statement.
    #[error("Invalid update: {0}")]
    InvalidUpdate(String),

    /// Lifecycle state was requested for an observation that was never tracked.
    #[error("Unknown observation: {0}")]
    UnknownObservation(String),

    /// No belief is stored under the given id.
    #[error("Belief not found: {0}")]
    BeliefNotFound(String),

    /// A belief, observation or argument failed validation.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// A vector does not match the dimension of the index it was given to.
    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension the index was created with.
        expected: usize,
        /// Length of the offending vector.
        actual: usize,
    },

    /// The embedding provider could not produce a vector.
    #[error("Embedding failed: {0}")]
    EmbeddingFailed(String),

    /// Storage layer failure.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// A stored record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result alias used throughout the domain, ports and services.
pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
