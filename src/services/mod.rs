pub mod accumulation_tracker;
pub mod bayesian_update;
pub mod belief_store;
pub mod confidence_rules;
pub mod similarity_finder;

pub use accumulation_tracker::AccumulationTracker;
pub use bayesian_update::bayesian_update;
pub use belief_store::{BeliefStore, BeliefStoreParts, PruneReport, StoreStats};
pub use confidence_rules::transition;
pub use similarity_finder::{SimilarityFinder, DEFAULT_OVERFETCH_FACTOR};
