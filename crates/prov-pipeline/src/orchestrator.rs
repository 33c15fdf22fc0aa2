//! Lookup orchestration.
//!
//! ```text
//! image? ──▶ vision ──▶ merge? ─┐
//!                               ├─▶ knowledge ──▶ verification ──▶ assessment ──▶ determination
//! manual data ──────────────────┘
//! ```
//!
//! Stages run sequentially within one lookup; separate lookups share nothing
//! but the immutable stage objects.

use chrono::Utc;
use prov_core::entities::{
    EvidenceAssessment, ManualData, MergedContext, OwnershipDetermination, ProductHints,
    VisionContext,
};
use prov_core::enums::{SubjectSource, VerificationStatus};
use prov_llm::ImagePayload;

use crate::{
    AssessmentInput, EvidenceAssessor, EvidenceVerifier, HypothesisGenerator, SubjectQuery,
    VisionContextBuilder, is_regulated_brand, merge_vision_with_manual, validate_vision_context,
};

/// Identification confidence assigned when manual data replaces a failed
/// vision reading.
const MANUAL_FALLBACK_CONFIDENCE: f64 = 60.0;

const UNRESOLVED_REASONING: &str = "vision_extraction_failed_no_fallback";

/// One lookup: an optional packaging image and whatever was typed in.
#[derive(Debug, Clone, Default)]
pub struct LookupRequest {
    pub image: Option<ImagePayload>,
    pub manual: ManualData,
}

fn filled(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

struct Subject {
    source: SubjectSource,
    product: Option<String>,
    brand: Option<String>,
    hints: ProductHints,
    identification_confidence: Option<f64>,
    vision: Option<VisionContext>,
    merged: Option<MergedContext>,
}

impl Subject {
    fn manual(source: SubjectSource, manual: &ManualData, vision: Option<VisionContext>) -> Self {
        let own_hints = ProductHints {
            country_of_origin: manual.country_of_origin.clone(),
            ..ProductHints::default()
        };
        Self {
            source,
            product: manual.product_name.clone(),
            brand: manual.brand.clone(),
            hints: own_hints.overlay(&manual.hints),
            identification_confidence: if source == SubjectSource::ManualFallback {
                Some(MANUAL_FALLBACK_CONFIDENCE)
            } else {
                manual.confidence
            },
            vision,
            merged: None,
        }
    }

    fn query(&self) -> SubjectQuery {
        let product = filled(self.product.as_ref()).or_else(|| filled(self.brand.as_ref()));
        let brand = filled(self.brand.as_ref()).or_else(|| filled(self.product.as_ref()));
        let (product, brand) = (product.unwrap_or_default(), brand.unwrap_or_default());
        SubjectQuery {
            product: product.to_string(),
            brand: brand.to_string(),
            data_source: self.source.data_source_tag(),
            region_hint: self.hints.country_of_origin.clone(),
        }
    }
}

pub struct OwnershipPipeline {
    vision: VisionContextBuilder,
    knowledge: HypothesisGenerator,
    verifier: EvidenceVerifier,
    assessor: EvidenceAssessor,
}

impl OwnershipPipeline {
    #[must_use]
    pub const fn new(
        vision: VisionContextBuilder,
        knowledge: HypothesisGenerator,
        verifier: EvidenceVerifier,
        assessor: EvidenceAssessor,
    ) -> Self {
        Self {
            vision,
            knowledge,
            verifier,
            assessor,
        }
    }

    /// Run a lookup to a determination. Never fails.
    pub async fn run(&self, request: LookupRequest) -> OwnershipDetermination {
        let mut stage_path = Vec::new();
        let subject = self.resolve(&request, &mut stage_path).await;
        tracing::debug!(source = %subject.source, brand = ?subject.brand, "pipeline: subject resolved");

        if subject.source == SubjectSource::Unresolved {
            return unresolved(subject, stage_path);
        }

        let query = subject.query();
        stage_path.push(String::from("knowledge"));
        let hypothesis = self.knowledge.generate(&query).await;

        stage_path.push(String::from("verification"));
        let verification = self
            .verifier
            .verify(&hypothesis, &query.product, &query.brand)
            .await;
        let adjusted = verification.apply_to(hypothesis.confidence_score);

        stage_path.push(String::from("assessment"));
        let assessment = self
            .assessor
            .assess(AssessmentInput {
                product: &query.product,
                brand: &query.brand,
                hypothesis: &hypothesis,
                verification: &verification,
                original_confidence: adjusted,
            })
            .await;

        let reasoning = determination_reasoning(&hypothesis.reasoning, &assessment);
        tracing::debug!(
            confidence = assessment.confidence_assessment.verified_confidence,
            status = %assessment.verification_status,
            "pipeline: determination complete"
        );
        OwnershipDetermination {
            regulated_brand: is_regulated_brand(&query.brand, &query.product),
            product: subject.product,
            brand: subject.brand,
            financial_beneficiary: hypothesis.financial_beneficiary.clone(),
            beneficiary_country: hypothesis.beneficiary_country.clone(),
            ownership_structure_type: hypothesis.ownership_structure_type.clone(),
            confidence: assessment.confidence_assessment.verified_confidence,
            verification_status: assessment.verification_status,
            reasoning,
            subject_source: subject.source,
            identification_confidence: subject.identification_confidence,
            hypothesis: Some(hypothesis),
            verification: Some(verification),
            assessment: Some(assessment),
            vision: subject.vision,
            merged: subject.merged,
            stage_path,
            determined_at: Utc::now(),
        }
    }

    async fn resolve(&self, request: &LookupRequest, stage_path: &mut Vec<String>) -> Subject {
        let manual = &request.manual;
        let Some(image) = request.image.as_ref() else {
            let source = if manual.has_subject() {
                SubjectSource::Manual
            } else {
                SubjectSource::Unresolved
            };
            return Subject::manual(source, manual, None);
        };

        stage_path.push(String::from("vision"));
        let context = self.vision.build(image, &manual.hints).await;
        let validation = validate_vision_context(Some(&context));
        if !validation.is_valid {
            tracing::warn!(reason = %validation.reason, "pipeline: vision context rejected");
            let source = if manual.has_subject() {
                SubjectSource::ManualFallback
            } else {
                SubjectSource::Unresolved
            };
            return Subject::manual(source, manual, Some(context));
        }

        if manual.is_empty() {
            return Subject {
                source: SubjectSource::Vision,
                product: context.product_name.clone(),
                brand: context.brand.clone(),
                hints: context.hints(),
                identification_confidence: Some(context.confidence),
                vision: Some(context),
                merged: None,
            };
        }

        stage_path.push(String::from("merge"));
        let merged = merge_vision_with_manual(&context, manual);
        let hints = ProductHints {
            country_of_origin: merged.country_of_origin.clone(),
            ..ProductHints::default()
        }
        .overlay(&merged.hints);
        Subject {
            source: SubjectSource::Merged,
            product: merged.product_name.clone(),
            brand: merged.brand.clone(),
            hints,
            identification_confidence: Some(merged.confidence),
            vision: Some(context),
            merged: Some(merged),
        }
    }
}

fn determination_reasoning(hypothesis_reasoning: &str, assessment: &EvidenceAssessment) -> String {
    [hypothesis_reasoning, assessment.reasoning.as_str()]
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}

fn unresolved(subject: Subject, stage_path: Vec<String>) -> OwnershipDetermination {
    tracing::warn!("pipeline: no product or brand to research");
    OwnershipDetermination {
        product: subject.product,
        brand: subject.brand,
        financial_beneficiary: None,
        beneficiary_country: None,
        ownership_structure_type: None,
        confidence: 0,
        verification_status: VerificationStatus::InsufficientEvidence,
        reasoning: String::from(UNRESOLVED_REASONING),
        subject_source: SubjectSource::Unresolved,
        identification_confidence: None,
        regulated_brand: false,
        hypothesis: None,
        verification: None,
        assessment: None,
        vision: subject.vision,
        merged: None,
        stage_path,
        determined_at: Utc::now(),
    }
}
