//! Evidence-Assessment Stage.
//!
//! A second, richer pass: optional web research, then a backend
//! classification of the evidence into four disjoint buckets. The
//! confidence numbers are owned by this stage, not the backend:
//! `original_confidence` comes from the pipeline, and the change enum is
//! derived from the two numbers. Confidence only rises when the reply
//! names supporting evidence and something outside the backend backs it:
//! a source the verifier accepted or a research snippet.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use prov_core::de;
use prov_core::entities::{
    ConfidenceAssessment, EvidenceAssessment, EvidenceBuckets, OwnershipHypothesis,
    VerificationResult,
};
use prov_core::enums::VerificationStatus;
use prov_llm::{CompletionRequest, GenerativeBackend, SearchSnippet, WebSearch};
use serde::Deserialize;
use serde_json::json;

use crate::{StageError, bounded, prompts};

const REGULATED_KEYWORDS: [&str; 13] = [
    "pharmacy",
    "medical",
    "health",
    "drug",
    "medicine",
    "clinic",
    "hospital",
    "pharmaceutical",
    "healthcare",
    "therapeutic",
    "diagnostic",
    "clinical",
    "medicinal",
];

/// Whether `brand` + `product` looks like a medical or otherwise regulated
/// brand. Informational only.
#[must_use]
pub fn is_regulated_brand(brand: &str, product: &str) -> bool {
    let haystack = format!("{brand} {product}").to_lowercase();
    REGULATED_KEYWORDS.iter().any(|keyword| haystack.contains(keyword))
}

fn ownership_queries(brand: &str) -> [String; 5] {
    [
        format!("{brand} ownership parent company"),
        format!("{brand} subsidiary of"),
        format!("who owns {brand}"),
        format!("{brand} corporate structure"),
        format!("{brand} ultimate parent"),
    ]
}

/// Drop snippets whose title and leading content repeat an earlier one.
fn dedupe_snippets(snippets: Vec<SearchSnippet>) -> Vec<SearchSnippet> {
    let mut seen = HashSet::new();
    snippets
        .into_iter()
        .filter(|snippet| {
            let head: String = snippet.content.chars().take(100).collect();
            seen.insert(format!("{}{head}", snippet.title))
        })
        .collect()
}

#[derive(Deserialize, Default)]
struct ReplyConfidence {
    #[serde(default, deserialize_with = "de::opt_number")]
    verified_confidence: Option<f64>,
}

#[derive(Deserialize, Default)]
struct ReplyEvidence {
    #[serde(default, deserialize_with = "de::string_list")]
    supporting_evidence: Vec<String>,
    #[serde(default, deserialize_with = "de::string_list")]
    contradicting_evidence: Vec<String>,
    #[serde(default, deserialize_with = "de::string_list")]
    neutral_evidence: Vec<String>,
    #[serde(default, deserialize_with = "de::string_list")]
    missing_evidence: Vec<String>,
}

#[derive(Deserialize)]
struct AssessmentReply {
    #[serde(default, deserialize_with = "de::text")]
    verification_status: String,
    #[serde(default)]
    confidence_assessment: Option<ReplyConfidence>,
    #[serde(default)]
    evidence_analysis: Option<ReplyEvidence>,
    #[serde(default, deserialize_with = "de::text")]
    summary: String,
    #[serde(default, deserialize_with = "de::text")]
    reasoning: String,
}

impl AssessmentReply {
    fn into_assessment(self, original_confidence: u8, corroborated: bool) -> EvidenceAssessment {
        let evidence = self.evidence_analysis.unwrap_or_default();
        let buckets = EvidenceBuckets {
            supporting: evidence.supporting_evidence,
            contradicting: evidence.contradicting_evidence,
            neutral: evidence.neutral_evidence,
            missing: evidence.missing_evidence,
        }
        .into_disjoint();

        let reported = self
            .confidence_assessment
            .and_then(|c| c.verified_confidence)
            .map_or(original_confidence, de::clamp_score);
        let verified = if reported <= original_confidence {
            reported
        } else if buckets.supporting.is_empty() {
            tracing::warn!(reported, "assess: increase without supporting evidence ignored");
            original_confidence
        } else if !corroborated {
            tracing::warn!(reported, "assess: increase without sources or research ignored");
            original_confidence
        } else {
            reported
        };

        let mut status = VerificationStatus::from_backend(&self.verification_status);
        if status == VerificationStatus::Confirmed && !corroborated {
            status = VerificationStatus::InsufficientEvidence;
        }

        EvidenceAssessment::new(
            status,
            buckets,
            ConfidenceAssessment::new(original_confidence, verified),
            self.summary,
            self.reasoning,
        )
    }
}

/// What the assessment stage is asked to check.
#[derive(Debug, Clone, Copy)]
pub struct AssessmentInput<'a> {
    pub product: &'a str,
    pub brand: &'a str,
    pub hypothesis: &'a OwnershipHypothesis,
    pub verification: &'a VerificationResult,
    /// Hypothesis score after the verifier's adjustment.
    pub original_confidence: u8,
}

pub struct EvidenceAssessor {
    backend: Arc<dyn GenerativeBackend>,
    search: Option<Arc<dyn WebSearch>>,
    model: String,
    max_tokens: u32,
    timeout: Duration,
}

impl EvidenceAssessor {
    /// `search` is optional; without it the backend sees no snippets.
    #[must_use]
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        search: Option<Arc<dyn WebSearch>>,
        model: impl Into<String>,
        max_tokens: u32,
        timeout: Duration,
    ) -> Self {
        Self {
            backend,
            search,
            model: model.into(),
            max_tokens,
            timeout,
        }
    }

    pub async fn assess(&self, input: AssessmentInput<'_>) -> EvidenceAssessment {
        if !input.hypothesis.has_beneficiary() {
            tracing::debug!(brand = input.brand, "assess: no ownership claim, skipping");
            return EvidenceAssessment::degraded(
                input.original_confidence,
                "No ownership claim to assess",
            );
        }
        tracing::debug!(brand = input.brand, original = input.original_confidence, "assess: starting");
        let snippets = self.research(input.brand).await;
        match self.try_assess(&input, &snippets).await {
            Ok(assessment) => assessment,
            Err(error @ StageError::Extraction(_)) => {
                tracing::warn!(%error, "assess: unreadable reply");
                EvidenceAssessment::degraded(
                    input.original_confidence,
                    format!("Failed to parse assessment response: {error}"),
                )
            }
            Err(error) => {
                tracing::warn!(%error, "assess: stage degraded");
                EvidenceAssessment::degraded(
                    input.original_confidence,
                    format!("Assessment failed: {error}"),
                )
            }
        }
    }

    async fn research(&self, brand: &str) -> Vec<SearchSnippet> {
        let Some(search) = self.search.as_ref() else {
            return Vec::new();
        };
        let mut snippets = Vec::new();
        for query in ownership_queries(brand) {
            match bounded("search", self.timeout, search.search(&query)).await {
                Ok(hits) => snippets.extend(hits),
                Err(error) => tracing::warn!(%error, query = %query, "assess: search query failed"),
            }
        }
        let snippets = dedupe_snippets(snippets);
        tracing::debug!(count = snippets.len(), "assess: research complete");
        snippets
    }

    async fn try_assess(
        &self,
        input: &AssessmentInput<'_>,
        snippets: &[SearchSnippet],
    ) -> Result<EvidenceAssessment, StageError> {
        let existing = json!({
            "product": input.product,
            "brand": input.brand,
            "financial_beneficiary": input.hypothesis.financial_beneficiary,
            "beneficiary_country": input.hypothesis.beneficiary_country,
            "ownership_structure_type": input.hypothesis.ownership_structure_type,
            "confidence_score": input.original_confidence,
            "verification_status": input.verification.verification_status,
            "evidence_found": input.verification.evidence_found,
            "sources": input.verification.sources,
        });
        let request = CompletionRequest {
            model: self.model.clone(),
            prompt: prompts::assessment(input.brand, &existing, snippets),
            max_tokens: self.max_tokens,
        };
        let text = bounded("assessment", self.timeout, self.backend.complete(&request)).await?;
        let reply: AssessmentReply = prov_core::extract_record(&text)?;
        let corroborated = !input.verification.sources.is_empty() || !snippets.is_empty();
        Ok(reply.into_assessment(input.original_confidence, corroborated))
    }
}
