pub mod belief;
pub mod confidence;
pub mod config;
pub mod lifecycle;
pub mod observation;
pub mod similarity;

pub use belief::{Belief, BeliefPosterior, BeliefPrior, BeliefQuery, BELIEF_SCHEMA};
pub use confidence::{ConfidenceLevel, EvidenceType};
pub use config::{
    AccumulationConfig, Config, DatabaseConfig, EmbeddingConfig, LoggingConfig, SimilarityConfig,
};
pub use lifecycle::{LifecycleStats, ObservationLifecycle, ObservationState};
pub use observation::{Observation, OBSERVATION_SCHEMA};
pub use similarity::{
    AccumulationHotspot, Connection, EdgeDirection, SimilarityEdge, SimilarityMatch,
};
