//! Confidence levels and evidence classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::DomainError;

/// Natural language confidence attached to a belief.
///
/// The scale is totally ordered: `Unknown < Low < Medium < High`.
/// Variant order is load-bearing for the derived `Ord`.
///
/// - `High`: verified against behavior, multiple confirmations
/// - `Medium`: single confirmation, plausible but not certain
/// - `Low`: tentative hypothesis, needs validation before acting
/// - `Unknown`: explicitly uncertain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Unknown,
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// Every level, lowest first.
    pub const ALL: [Self; 4] = [Self::Unknown, Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Position on the scale, `Unknown` = 0.
    pub fn rank(self) -> i64 {
        self as i64
    }

    /// Levels at or above `self`, lowest first.
    ///
    /// Used for "at least MEDIUM" style queries.
    pub fn at_or_above(self) -> Vec<Self> {
        Self::ALL.into_iter().filter(|level| *level >= self).collect()
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfidenceLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unknown" => Ok(Self::Unknown),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(DomainError::ValidationFailed(format!(
                "unknown confidence level: {other}"
            ))),
        }
    }
}

/// How an observation relates to a belief's current posterior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceType {
    /// Supports the existing belief.
    Confirming,
    /// Challenges the existing belief.
    Contradicting,
    /// Neither supports nor contradicts.
    Neutral,
}

impl EvidenceType {
    pub const ALL: [Self; 3] = [Self::Confirming, Self::Contradicting, Self::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirming => "confirming",
            Self::Contradicting => "contradicting",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for EvidenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvidenceType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirming" => Ok(Self::Confirming),
            "contradicting" => Ok(Self::Contradicting),
            "neutral" => Ok(Self::Neutral),
            other => Err(DomainError::ValidationFailed(format!(
                "unknown evidence type: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_ordering() {
        assert!(ConfidenceLevel::Unknown < ConfidenceLevel::Low);
        assert!(ConfidenceLevel::Low < ConfidenceLevel::Medium);
        assert!(ConfidenceLevel::Medium < ConfidenceLevel::High);
    }

    #[test]
    fn test_at_or_above() {
        assert_eq!(
            ConfidenceLevel::Medium.at_or_above(),
            vec![ConfidenceLevel::Medium, ConfidenceLevel::High]
        );
        assert_eq!(ConfidenceLevel::Unknown.at_or_above().len(), 4);
        assert_eq!(ConfidenceLevel::High.at_or_above(), vec![ConfidenceLevel::High]);
    }

    #[test]
    fn test_string_forms() {
        for level in ConfidenceLevel::ALL {
            assert_eq!(level.as_str().parse::<ConfidenceLevel>().unwrap(), level);
        }
        for evidence in EvidenceType::ALL {
            assert_eq!(evidence.as_str().parse::<EvidenceType>().unwrap(), evidence);
        }
        assert!("certain".parse::<ConfidenceLevel>().is_err());
        assert!("HIGH".parse::<ConfidenceLevel>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&ConfidenceLevel::High).unwrap();
        assert_eq!(json, "\"high\"");
        let evidence: EvidenceType = serde_json::from_str("\"contradicting\"").unwrap();
        assert_eq!(evidence, EvidenceType::Contradicting);
    }
}
