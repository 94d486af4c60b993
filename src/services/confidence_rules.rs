//! Confidence transition rules.
//!
//! | current | confirming | contradicting | neutral |
//! |---------|------------|---------------|---------|
//! | unknown | low        | low           | unknown |
//! | low     | medium     | low           | low     |
//! | medium  | high       | low           | medium  |
//! | high    | high       | medium        | high    |
//!
//! Confirming evidence never lowers confidence. A single contradiction
//! demotes a high belief by one step only, and leaves an uncertain belief
//! at low. Neutral evidence is the identity.

use crate::domain::models::{ConfidenceLevel, EvidenceType};

/// Next confidence after evidence of the given type.
pub fn transition(current: ConfidenceLevel, evidence: EvidenceType) -> ConfidenceLevel {
    use ConfidenceLevel::{High, Low, Medium, Unknown};

    match (current, evidence) {
        (_, EvidenceType::Neutral) => current,

        (Unknown, EvidenceType::Confirming) => Low,
        (Low, EvidenceType::Confirming) => Medium,
        (Medium | High, EvidenceType::Confirming) => High,

        (Unknown | Low | Medium, EvidenceType::Contradicting) => Low,
        (High, EvidenceType::Contradicting) => Medium,
    }
}
