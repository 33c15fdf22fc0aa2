use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// First-pass, unverified ownership claim for a product/brand pair.
///
/// `confidence_score` is self-reported by the generating stage and has not
/// been adjusted by any evidence.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct OwnershipHypothesis {
    pub financial_beneficiary: Option<String>,
    pub beneficiary_country: Option<String>,
    pub confidence_score: u8,
    pub ownership_structure_type: Option<String>,
    pub reasoning: String,
}

impl OwnershipHypothesis {
    /// The record returned when the stage could not produce a hypothesis.
    #[must_use]
    pub fn degraded(reason: impl Into<String>) -> Self {
        Self {
            financial_beneficiary: None,
            beneficiary_country: None,
            confidence_score: 0,
            ownership_structure_type: None,
            reasoning: reason.into(),
        }
    }

    /// Whether a named beneficiary exists that a verifier could check.
    #[must_use]
    pub fn has_beneficiary(&self) -> bool {
        self.financial_beneficiary
            .as_deref()
            .map(str::trim)
            .is_some_and(|name| !name.is_empty() && !name.eq_ignore_ascii_case("unknown"))
    }
}
