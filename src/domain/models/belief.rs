//! Belief (comprehension) domain model.
//!
//! A belief follows a prior → observations → posterior structure and is
//! treated as a value: every update produces a new version instead of
//! mutating the stored one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::confidence::ConfidenceLevel;

/// Schema tag carried by every serialized belief.
pub const BELIEF_SCHEMA: &str = "comprehension/v1";

/// What was believed before any observation was incorporated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeliefPrior {
    pub statement: String,
    pub confidence: ConfidenceLevel,
    /// Where the prior came from: "training", "documentation", "accumulated", ...
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl BeliefPrior {
    pub fn new(
        statement: impl Into<String>,
        confidence: ConfidenceLevel,
        source: impl Into<String>,
    ) -> Self {
        Self {
            statement: statement.into(),
            confidence,
            source: source.into(),
            reasoning: None,
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }
}

/// What is believed now, and which observations produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeliefPosterior {
    pub statement: String,
    pub confidence: ConfidenceLevel,
    pub update_reasoning: String,
    pub observations_used: Vec<String>,
}

/// A versioned, evidence-backed statement with a confidence level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Belief {
    /// Caller-assigned, globally unique (e.g. `comp-api-auth-001`).
    pub id: String,
    pub topic: String,
    /// Free-text category used for retrieval and cross-domain filtering.
    pub domain: String,
    pub prior: BeliefPrior,
    /// Every observation id ever incorporated. Never shrinks, even after
    /// the observation content has been pruned.
    pub observations: Vec<String>,
    pub posterior: BeliefPosterior,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub version: u64,
    #[serde(default)]
    pub verified: bool,
    #[serde(default = "default_schema")]
    pub schema: String,
}

fn default_schema() -> String {
    BELIEF_SCHEMA.to_string()
}

impl Belief {
    /// Create version 1 of a belief whose posterior mirrors its prior.
    pub fn new(
        id: impl Into<String>,
        topic: impl Into<String>,
        domain: impl Into<String>,
        prior: BeliefPrior,
    ) -> Self {
        let now = Utc::now();
        let posterior = BeliefPosterior {
            statement: prior.statement.clone(),
            confidence: prior.confidence,
            update_reasoning: "Initial belief".to_string(),
            observations_used: Vec::new(),
        };

        Self {
            id: id.into(),
            topic: topic.into(),
            domain: domain.into(),
            prior,
            observations: Vec::new(),
            posterior,
            created: now,
            updated: now,
            version: 1,
            verified: false,
            schema: default_schema(),
        }
    }

    pub fn with_posterior(mut self, posterior: BeliefPosterior) -> Self {
        for id in &posterior.observations_used {
            if !self.observations.contains(id) {
                self.observations.push(id.clone());
            }
        }
        self.posterior = posterior;
        self
    }

    pub fn with_verified(mut self, verified: bool) -> Self {
        self.verified = verified;
        self
    }

    /// Current posterior confidence.
    pub fn confidence(&self) -> ConfidenceLevel {
        self.posterior.confidence
    }

    pub fn has_observation(&self, observation_id: &str) -> bool {
        self.observations.iter().any(|id| id == observation_id)
    }

    /// Text used to place the belief in embedding space.
    ///
    /// Prior and posterior together capture the shape of the belief
    /// transformation rather than only its subject matter.
    pub fn embedding_text(&self) -> String {
        format!("{} {}", self.prior.statement, self.posterior.statement)
    }

    /// Copy-with-changes constructor for the next version.
    ///
    /// Appends `observation_id` to both provenance lists, bumps the version
    /// by exactly one and stamps `updated`. `self` is left untouched.
    pub(crate) fn next_version(&self, posterior: BeliefPosterior, observation_id: &str) -> Self {
        let mut observations = Vec::with_capacity(self.observations.len() + 1);
        observations.extend(self.observations.iter().cloned());
        observations.push(observation_id.to_string());

        Self {
            observations,
            posterior,
            updated: Utc::now(),
            version: self.version + 1,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("Belief id cannot be empty".to_string());
        }
        if self.domain.trim().is_empty() {
            return Err("Belief domain cannot be empty".to_string());
        }
        if self.topic.trim().is_empty() {
            return Err("Belief topic cannot be empty".to_string());
        }
        if self.prior.statement.trim().is_empty() {
            return Err("Prior statement cannot be empty".to_string());
        }
        if self.posterior.statement.trim().is_empty() {
            return Err("Posterior statement cannot be empty".to_string());
        }
        if self.posterior.update_reasoning.trim().is_empty() {
            return Err("Posterior update_reasoning cannot be empty".to_string());
        }
        if self.version == 0 {
            return Err("Belief version starts at 1".to_string());
        }

        let known: HashSet<&str> = self.observations.iter().map(String::as_str).collect();
        if let Some(missing) = self
            .posterior
            .observations_used
            .iter()
            .find(|id| !known.contains(id.as_str()))
        {
            return Err(format!(
                "Posterior uses observation {missing} which is not listed in observations"
            ));
        }

        Ok(())
    }
}

/// Filter for belief queries. Unset fields do not filter.
///
/// Results are always ordered most recently updated first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeliefQuery {
    pub domain: Option<String>,
    pub min_confidence: Option<ConfidenceLevel>,
    pub limit: Option<usize>,
}

impl BeliefQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn min_confidence(mut self, level: ConfidenceLevel) -> Self {
        self.min_confidence = Some(level);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
