//! Bayesian-style belief update: prior + observation → posterior.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Belief, BeliefPosterior, EvidenceType, Observation};

use super::confidence_rules::transition;

/// Incorporate one observation into a belief and return the next version.
///
/// * Re-applying an observation the belief already lists returns the
///   belief unchanged.
/// * Contradicting evidence requires `new_statement`.
/// * Without explicit `reasoning`, a deterministic justification naming the
///   observation, the evidence type and the confidence change is used.
///
/// The input belief is never modified.
pub fn bayesian_update(
    observation: &Observation,
    belief: &Belief,
    evidence: EvidenceType,
    new_statement: Option<&str>,
    reasoning: Option<&str>,
) -> DomainResult<Belief> {
    if belief.has_observation(&observation.id) {
        tracing::debug!(
            belief_id = %belief.id,
            observation_id = %observation.id,
            "observation already incorporated, skipping"
        );
        return Ok(belief.clone());
    }

    if evidence == EvidenceType::Contradicting && new_statement.is_none() {
        return Err(DomainError::InvalidUpdate(format!(
            "Contradicting observation {} on belief {} requires a revised statement",
            observation.id, belief.id
        )));
    }

    let old_confidence = belief.posterior.confidence;
    let new_confidence = transition(old_confidence, evidence);

    let update_reasoning = match reasoning {
        Some(r) => r.to_string(),
        None => format!(
            "Observation {} ({}) changed confidence from {} to {}",
            observation.id, evidence, old_confidence, new_confidence
        ),
    };

    let mut observations_used = belief.posterior.observations_used.clone();
    observations_used.push(observation.id.clone());

    let posterior = BeliefPosterior {
        statement: new_statement.map_or_else(|| belief.posterior.statement.clone(), str::to_string),
        confidence: new_confidence,
        update_reasoning,
        observations_used,
    };

    let updated = belief.next_version(posterior, &observation.id);
    tracing::debug!(
        belief_id = %updated.id,
        observation_id = %observation.id,
        evidence = %evidence,
        from = %old_confidence,
        to = %new_confidence,
        version = updated.version,
        "belief updated"
    );
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{BeliefPrior, ConfidenceLevel};

    fn belief(level: ConfidenceLevel) -> Belief {
        Belief::new(
            "comp-api-001",
            "rate limiting",
            "api",
            BeliefPrior::new("The API allows 100 requests per minute", level, "documentation"),
        )
    }

    fn observation(id: &str) -> Observation {
        Observation::new("agent/api", "received 429 at request 101").with_id(id)
    }

    #[test]
    fn test_confirming_promotes_and_versions() {
        let b = belief(ConfidenceLevel::Low);
        let updated = bayesian_update(&observation("obs-1"), &b, EvidenceType::Confirming, None, None).unwrap();

        assert_eq!(updated.confidence(), ConfidenceLevel::Medium);
        assert_eq!(updated.version, 2);
        assert_eq!(updated.observations, vec!["obs-1".to_string()]);
        assert_eq!(updated.posterior.observations_used, vec!["obs-1".to_string()]);
        assert_eq!(updated.posterior.statement, b.posterior.statement);
        assert!(updated.updated >= b.updated);
    }

    #[test]
    fn test_reapplying_is_noop() {
        let b = belief(ConfidenceLevel::Low);
        let obs = observation("obs-1");
        let once = bayesian_update(&obs, &b, EvidenceType::Confirming, None, None).unwrap();
        let twice = bayesian_update(&obs, &once, EvidenceType::Confirming, None, None).unwrap();
        assert_eq!(twice, once);
    }

    #[test]
    fn test_contradiction_requires_statement() {
        let b = belief(ConfidenceLevel::High);
        let err = bayesian_update(&observation("obs-1"), &b, EvidenceType::Contradicting, None, None).unwrap_err();
        assert!(matches!(err, DomainError::InvalidUpdate(_)));
    }

    #[test]
    fn test_contradiction_replaces_statement_and_demotes() {
        let b = belief(ConfidenceLevel::High);
        let updated = bayesian_update(
            &observation("obs-1"),
            &b,
            EvidenceType::Contradicting,
            Some("The API allows 60 requests per minute"),
            Some("429 observed at request 61"),
        )
        .unwrap();

        assert_eq!(updated.confidence(), ConfidenceLevel::Medium);
        assert_eq!(updated.posterior.statement, "The API allows 60 requests per minute");
        assert_eq!(updated.posterior.update_reasoning, "429 observed at request 61");
        assert_eq!(updated.prior, b.prior);
    }

    #[test]
    fn test_synthesized_reasoning_names_transition() {
        let b = belief(ConfidenceLevel::Medium);
        let updated = bayesian_update(&observation("obs-9"), &b, EvidenceType::Confirming, None, None).unwrap();
        assert_eq!(
            updated.posterior.update_reasoning,
            "Observation obs-9 (confirming) changed confidence from medium to high"
        );
    }

    #[test]
    fn test_input_belief_untouched() {
        let b = belief(ConfidenceLevel::Low);
        let snapshot = b.clone();
        let _ = bayesian_update(&observation("obs-1"), &b, EvidenceType::Confirming, None, None).unwrap();
        assert_eq!(b, snapshot);
    }

    #[test]
    fn test_prior_entries_preserved_in_order() {
        let b = belief(ConfidenceLevel::Unknown);
        let b = bayesian_update(&observation("obs-1"), &b, EvidenceType::Neutral, None, None).unwrap();
        let b = bayesian_update(&observation("obs-2"), &b, EvidenceType::Confirming, None, None).unwrap();

        assert_eq!(b.observations, vec!["obs-1".to_string(), "obs-2".to_string()]);
        assert_eq!(b.posterior.observations_used, b.observations);
        assert_eq!(b.version, 3);
        assert!(b.validate().is_ok());
    }
}
