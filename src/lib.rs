//! Comprehension - an evidence-backed belief store
//!
//! Beliefs are versioned statements with a natural-language confidence
//! level. Observations update them through a fixed confidence transition
//! table, observation content is garbage collected once incorporated
//! while the ids survive as provenance, and belief embeddings surface
//! patterns that recur across unrelated domains.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and port traits
//! - **Service Layer** (`services`): update rules, similarity search,
//!   accumulation tracking and the [`BeliefStore`] facade
//! - **Adapters** (`adapters`): SQLite, in-memory vector index and the
//!   hashing embedder
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//!
//! # Example
//!
//! ```ignore
//! use comprehension::{BeliefStore, ConfigLoader};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let store = BeliefStore::open(&config).await?;
//!     let hotspots = store.default_hotspots().await?;
//!     println!("{} hotspots", hotspots.len());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    AccumulationHotspot, Belief, BeliefPosterior, BeliefPrior, BeliefQuery, ConfidenceLevel,
    Config, Connection, EdgeDirection, EvidenceType, Observation, ObservationLifecycle,
    ObservationState, SimilarityEdge, SimilarityMatch,
};
pub use domain::ports::{
    BeliefRepository, EmbeddingProvider, EvidenceStore, ObservationIndex,
    SimilarityEdgeRepository, VectorIndex,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{
    bayesian_update, transition, AccumulationTracker, BeliefStore, PruneReport,
    SimilarityFinder, StoreStats,
};
