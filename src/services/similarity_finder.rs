//! Cross-domain similarity search over belief embeddings.
//!
//! The "this reminds me of" question: given a belief, which beliefs in
//! *other* domains have a similar shape? Same-domain hits are filtered
//! out, which is why the vector index is over-fetched.

use std::sync::Arc;
use tracing::instrument;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Belief, SimilarityMatch};
use crate::domain::ports::{BeliefRepository, EmbeddingProvider, VectorIndex};

/// Default multiplier applied to `limit` when querying the vector index.
pub const DEFAULT_OVERFETCH_FACTOR: usize = 3;

/// Embeds beliefs, keeps their vectors indexed and answers cross-domain
/// similarity queries.
pub struct SimilarityFinder {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    beliefs: Arc<dyn BeliefRepository>,
    overfetch_factor: usize,
}

impl SimilarityFinder {
    /// Finder with the default over-fetch factor.
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        beliefs: Arc<dyn BeliefRepository>,
    ) -> Self {
        Self {
            embedder,
            index,
            beliefs,
            overfetch_factor: DEFAULT_OVERFETCH_FACTOR,
        }
    }

    /// Set how many candidates are fetched per requested match. Values
    /// below 1 are raised to 1.
    pub fn with_overfetch_factor(mut self, factor: usize) -> Self {
        self.overfetch_factor = factor.max(1);
        self
    }

    /// Compute and store the belief's vector under its id, replacing any previous one.
    #[instrument(skip(self, belief), fields(belief_id = %belief.id), err)]
    pub async fn index(&self, belief: &Belief) -> DomainResult<()> {
        let vector = self.embedder.embed(&belief.embedding_text()).await?;
        self.index.upsert(&belief.id, &vector).await
    }

    /// Drop a belief's vector. Returns whether one was stored.
    #[instrument(skip(self), err)]
    pub async fn remove_index(&self, belief_id: &str) -> DomainResult<bool> {
        self.index.remove(belief_id).await
    }

    /// Beliefs from other domains similar to `belief`, most similar first.
    ///
    /// Candidates are skipped when they are the belief itself, when their
    /// belief no longer exists, when they share the query's domain
    /// (exact string match), or when `1 - distance < min_similarity`.
    #[instrument(skip(self, belief), fields(belief_id = %belief.id, domain = %belief.domain), err)]
    pub async fn reminds_me_of(
        &self,
        belief: &Belief,
        limit: usize,
        min_similarity: f64,
    ) -> DomainResult<Vec<SimilarityMatch>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let vector = self.embedder.embed(&belief.embedding_text()).await?;
        let candidates = self
            .index
            .knn(&vector, limit.saturating_mul(self.overfetch_factor))
            .await?;

        let mut matches = Vec::with_capacity(limit);
        for neighbor in candidates {
            if neighbor.key == belief.id {
                continue;
            }

            let Some(candidate) = self.beliefs.get(&neighbor.key).await? else {
                tracing::debug!(key = %neighbor.key, "skipping vector with no backing belief");
                continue;
            };

            if candidate.domain == belief.domain {
                continue;
            }

            let similarity = 1.0 - f64::from(neighbor.distance);
            if similarity < min_similarity {
                continue;
            }

            matches.push(SimilarityMatch {
                belief_id: candidate.id,
                domain: candidate.domain,
                similarity,
            });
            if matches.len() >= limit {
                break;
            }
        }

        Ok(matches)
    }

    /// [`reminds_me_of`](Self::reminds_me_of) for a stored belief.
    ///
    /// An unknown id yields no matches.
    #[instrument(skip(self), err)]
    pub async fn find_similar_to_id(
        &self,
        belief_id: &str,
        limit: usize,
        min_similarity: f64,
    ) -> DomainResult<Vec<SimilarityMatch>> {
        match self.beliefs.get(belief_id).await? {
            Some(belief) => self.reminds_me_of(&belief, limit, min_similarity).await,
            None => Ok(Vec::new()),
        }
    }
}
