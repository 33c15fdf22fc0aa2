use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::VerificationStatus;

/// Result of checking a hypothesis against open evidence.
///
/// `sources` holds only URLs the backend actually cited. Absence of evidence
/// is an empty list, never a placeholder.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct VerificationResult {
    pub verification_status: VerificationStatus,
    pub evidence_found: String,
    pub confidence_adjustment: i32,
    pub sources: Vec<String>,
    pub reasoning: String,
}

impl VerificationResult {
    /// The record returned when verification could not run or be parsed.
    #[must_use]
    pub fn degraded(evidence_found: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self {
            verification_status: VerificationStatus::InsufficientEvidence,
            evidence_found: evidence_found.into(),
            confidence_adjustment: 0,
            sources: Vec::new(),
            reasoning: reasoning.into(),
        }
    }

    /// The record for a claim no credible source could be found for.
    #[must_use]
    pub fn no_credible_sources(penalty: u8) -> Self {
        Self {
            verification_status: VerificationStatus::Contradicted,
            evidence_found: String::from("No credible sources found for this brand"),
            confidence_adjustment: -i32::from(penalty),
            sources: Vec::new(),
            reasoning: String::from(
                "No real evidence for this brand or company exists in public records or reputable sources.",
            ),
        }
    }

    /// Apply the adjustment to `confidence`, clamped to `0..=100`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn apply_to(&self, confidence: u8) -> u8 {
        (i32::from(confidence) + self.confidence_adjustment).clamp(0, 100) as u8
    }
}
