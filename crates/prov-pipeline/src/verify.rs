//! Evidence Verifier.
//!
//! The backend is asked to check a claim against real sources, but its
//! answer is not trusted as-is. [`enforce_source_policy`] is applied to every
//! reply:
//!
//! | reported status          | no credible sources left                     |
//! |--------------------------|----------------------------------------------|
//! | `confirmed`              | `insufficient_evidence`, adjustment `min(a, 0)` |
//! | `contradicted`           | adjustment exactly `-no_source_penalty`      |
//! | `insufficient_evidence`  | adjustment `min(a, 0)`                       |
//!
//! A source is credible only if it is an absolute `http`/`https` URL.

use std::sync::Arc;
use std::time::Duration;

use prov_core::de;
use prov_core::entities::{OwnershipHypothesis, VerificationResult};
use prov_core::enums::VerificationStatus;
use prov_llm::{CompletionRequest, GenerativeBackend};
use serde::Deserialize;
use url::Url;

use crate::{StageError, bounded, prompts};

#[derive(Deserialize)]
struct VerificationReply {
    #[serde(default, deserialize_with = "de::text")]
    verification_status: String,
    #[serde(default, deserialize_with = "de::text")]
    evidence_found: String,
    #[serde(default, deserialize_with = "de::adjustment")]
    confidence_adjustment: i32,
    #[serde(default, deserialize_with = "de::string_list")]
    sources: Vec<String>,
    #[serde(default, deserialize_with = "de::text")]
    reasoning: String,
}

/// Keep absolute `http`/`https` URLs, first occurrence only. Kept URLs are
/// returned as cited, minus surrounding whitespace.
fn credible_sources(raw: Vec<String>) -> Vec<String> {
    let mut sources: Vec<String> = Vec::with_capacity(raw.len());
    for candidate in raw {
        let cited = candidate.trim();
        let Ok(url) = Url::parse(cited) else {
            tracing::debug!(source = %candidate, "verify: dropping non-URL source");
            continue;
        };
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            continue;
        }
        if !sources.iter().any(|kept| kept == cited) {
            sources.push(cited.to_string());
        }
    }
    sources
}

/// Apply the no-fabrication policy to a backend-reported result.
#[must_use]
pub fn enforce_source_policy(mut result: VerificationResult, no_source_penalty: u8) -> VerificationResult {
    if !result.sources.is_empty() {
        return result;
    }
    match result.verification_status {
        VerificationStatus::Contradicted => {
            let fallback = VerificationResult::no_credible_sources(no_source_penalty);
            result.confidence_adjustment = fallback.confidence_adjustment;
            if result.evidence_found.is_empty() {
                result.evidence_found = fallback.evidence_found;
            }
            if result.reasoning.is_empty() {
                result.reasoning = fallback.reasoning;
            }
        }
        VerificationStatus::Confirmed => {
            tracing::warn!("verify: confirmed without sources, downgrading");
            result.verification_status = VerificationStatus::InsufficientEvidence;
            result.confidence_adjustment = result.confidence_adjustment.min(0);
        }
        VerificationStatus::InsufficientEvidence => {
            result.confidence_adjustment = result.confidence_adjustment.min(0);
        }
    }
    result
}

pub struct EvidenceVerifier {
    backend: Arc<dyn GenerativeBackend>,
    model: String,
    max_tokens: u32,
    timeout: Duration,
    no_source_penalty: u8,
}

impl EvidenceVerifier {
    #[must_use]
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        model: impl Into<String>,
        max_tokens: u32,
        timeout: Duration,
        no_source_penalty: u8,
    ) -> Self {
        Self {
            backend,
            model: model.into(),
            max_tokens,
            timeout,
            no_source_penalty,
        }
    }

    /// Verify `hypothesis` for `product`.
    ///
    /// A hypothesis without a named beneficiary is not sent to the backend.
    pub async fn verify(
        &self,
        hypothesis: &OwnershipHypothesis,
        product: &str,
        brand: &str,
    ) -> VerificationResult {
        let Some(beneficiary) = hypothesis
            .financial_beneficiary
            .as_deref()
            .filter(|_| hypothesis.has_beneficiary())
        else {
            tracing::debug!(brand, "verify: no beneficiary to check");
            return VerificationResult::degraded(
                "No ownership claim to verify",
                "The hypothesis names no financial beneficiary.",
            );
        };

        tracing::debug!(product, brand, beneficiary, "verify: checking claim");
        let request = CompletionRequest {
            model: self.model.clone(),
            prompt: prompts::verification(
                product,
                beneficiary,
                hypothesis.beneficiary_country.as_deref(),
            ),
            max_tokens: self.max_tokens,
        };

        let text = match bounded("verification", self.timeout, self.backend.complete(&request)).await {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(%error, "verify: backend call failed");
                return VerificationResult::degraded("Error during verification", format!("Error: {error}"));
            }
        };
        match prov_core::extract_record::<VerificationReply>(&text).map_err(StageError::from) {
            Ok(reply) => {
                let reported = VerificationResult {
                    verification_status: VerificationStatus::from_backend(&reply.verification_status),
                    evidence_found: reply.evidence_found,
                    confidence_adjustment: reply.confidence_adjustment,
                    sources: credible_sources(reply.sources),
                    reasoning: reply.reasoning,
                };
                enforce_source_policy(reported, self.no_source_penalty)
            }
            Err(error) => {
                tracing::warn!(%error, "verify: unreadable reply");
                VerificationResult::degraded(
                    "Could not parse JSON from LLM response",
                    "Malformed or unparsable JSON in LLM response.",
                )
            }
        }
    }
}
