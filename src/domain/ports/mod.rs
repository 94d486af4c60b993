//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - BeliefRepository: belief persistence and filtered lookup
//! - ObservationIndex: persisted observation references and pruned markers
//! - SimilarityEdgeRepository: directed similarity edges and hotspot aggregation
//! - EvidenceStore: observation content
//! - EmbeddingProvider: text to unit vector
//! - VectorIndex: keyed vectors with k-nearest-neighbor search

pub mod belief_repository;
pub mod embedding;
pub mod evidence_store;
pub mod observation_index;
pub mod similarity_edge_repository;
pub mod vector_index;

pub use belief_repository::BeliefRepository;
pub use embedding::EmbeddingProvider;
pub use evidence_store::EvidenceStore;
pub use observation_index::{ObservationIndex, ObservationIndexStats};
pub use similarity_edge_repository::SimilarityEdgeRepository;
pub use vector_index::{Neighbor, VectorIndex};
