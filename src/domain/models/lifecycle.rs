//! In-process observation lifecycle tracking for garbage collection.
//!
//! Once an observation has informed a belief, the posterior carries what
//! it taught and the observation content becomes redundant. This tracker
//! is the per-process working set for that decision; the persisted
//! [`ObservationIndex`](crate::domain::ports::ObservationIndex) is the
//! source of truth across restarts.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::domain::errors::{DomainError, DomainResult};

/// Lifecycle state of a tracked observation.
///
/// `Pending` → `Incorporated` is one-way. An incorporated observation is
/// collectible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationState {
    /// Recorded but not yet applied to any belief.
    Pending,
    /// Applied to at least one belief; content may be pruned.
    Incorporated,
}

impl ObservationState {
    /// Lowercase name, matching the serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Incorporated => "incorporated",
        }
    }
}

impl fmt::Display for ObservationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts reported by [`ObservationLifecycle::stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleStats {
    /// Observations waiting to be incorporated.
    pub pending: usize,
    /// Observations whose content can be pruned.
    pub incorporated: usize,
    /// Sum of both.
    pub total: usize,
}

/// Tracks which observations are pending and which have been incorporated.
///
/// Not synchronized: wrap in a mutex when shared between tasks.
#[derive(Debug, Clone, Default)]
pub struct ObservationLifecycle {
    pending: HashSet<String>,
    incorporated: HashSet<String>,
}

impl ObservationLifecycle {
    /// Empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observation as pending.
    ///
    /// Idempotent. An already incorporated observation is never demoted.
    pub fn register(&mut self, observation_id: &str) {
        if !self.incorporated.contains(observation_id) {
            self.pending.insert(observation_id.to_string());
        }
    }

    /// Record that an observation informed at least one belief.
    ///
    /// Works without a prior `register` and is a no-op when repeated.
    pub fn mark_incorporated(&mut self, observation_id: &str) {
        self.pending.remove(observation_id);
        self.incorporated.insert(observation_id.to_string());
    }

    /// Current state of a tracked observation.
    ///
    /// Returns [`DomainError::UnknownObservation`] for ids that were never
    /// tracked or have already been collected.
    pub fn get_state(&self, observation_id: &str) -> DomainResult<ObservationState> {
        if self.pending.contains(observation_id) {
            Ok(ObservationState::Pending)
        } else if self.incorporated.contains(observation_id) {
            Ok(ObservationState::Incorporated)
        } else {
            Err(DomainError::UnknownObservation(observation_id.to_string()))
        }
    }

    /// Stop tracking an incorporated observation after its content was deleted.
    ///
    /// Returns `false` without touching state for pending or unknown ids.
    pub fn collect(&mut self, observation_id: &str) -> bool {
        self.incorporated.remove(observation_id)
    }

    /// Whether the observation is tracked and still pending.
    pub fn is_pending(&self, observation_id: &str) -> bool {
        self.pending.contains(observation_id)
    }

    /// Whether the observation is tracked and incorporated.
    pub fn is_incorporated(&self, observation_id: &str) -> bool {
        self.incorporated.contains(observation_id)
    }

    /// Snapshot of pending ids.
    pub fn pending(&self) -> HashSet<String> {
        self.pending.clone()
    }

    /// Snapshot of ids safe for garbage collection.
    pub fn collectible(&self) -> HashSet<String> {
        self.incorporated.clone()
    }

    /// Number of tracked observations in either state.
    pub fn len(&self) -> usize {
        self.pending.len() + self.incorporated.len()
    }

    /// Whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.incorporated.is_empty()
    }

    /// Pending, incorporated and total counts.
    pub fn stats(&self) -> LifecycleStats {
        LifecycleStats {
            pending: self.pending.len(),
            incorporated: self.incorporated.len(),
            total: self.len(),
        }
    }
}
