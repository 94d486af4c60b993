//! Convergence models: similarity matches, edges and hotspots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A belief from another domain that resembles a query belief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatch {
    /// Id of the matching belief.
    pub belief_id: String,
    /// Domain of the matching belief.
    pub domain: String,
    /// `1 - cosine distance`; higher is more similar.
    pub similarity: f64,
}

/// A directed similarity relation, keyed by `(source_id, target_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityEdge {
    /// Belief the search started from.
    pub source_id: String,
    /// Belief that was found.
    pub target_id: String,
    /// Similarity at the time the edge was recorded.
    pub similarity: f64,
    /// Domain of the source belief.
    pub source_domain: String,
    /// Domain of the target belief.
    pub target_domain: String,
    /// When the edge was last recorded.
    pub created: DateTime<Utc>,
}

impl SimilarityEdge {
    /// Edge stamped with the current time.
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        similarity: f64,
        source_domain: impl Into<String>,
        target_domain: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            similarity,
            source_domain: source_domain.into(),
            target_domain: target_domain.into(),
            created: Utc::now(),
        }
    }
}

/// Which side of an edge the queried belief sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeDirection {
    /// The queried belief is the edge source.
    Outgoing,
    /// The queried belief is the edge target.
    Incoming,
}

/// One neighbor of a belief in the similarity graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// The belief on the other end of the edge.
    pub other_id: String,
    /// Its domain.
    pub other_domain: String,
    /// Edge similarity.
    pub similarity: f64,
    /// Whether the queried belief is the source or the target.
    pub direction: EdgeDirection,
}

/// A belief whose incoming similarity edges span several domains.
///
/// Derived by aggregation, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccumulationHotspot {
    /// The shared edge target.
    pub belief_id: String,
    /// Distinct source domains among incoming edges.
    pub domain_count: u64,
    /// Total incoming edges.
    pub connection_count: u64,
    /// Mean similarity over incoming edges.
    pub avg_similarity: f64,
}
