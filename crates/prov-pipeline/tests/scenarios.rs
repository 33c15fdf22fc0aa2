//! End-to-end lookups against fake collaborators.

mod common;

use std::sync::Arc;

use common::{
    INFLATED_ASSESSMENT, NO_SOURCES, OREO_HYPOTHESIS, ScriptedAnalyzer, StageBackend,
    UNCHANGED_ASSESSMENT, image, pipeline,
};
use pretty_assertions::assert_eq;
use prov_core::entities::ManualData;
use prov_core::enums::{ConfidenceChange, SubjectSource, VerificationStatus};
use prov_pipeline::LookupRequest;
use serde_json::json;

fn scripted() -> Arc<StageBackend> {
    Arc::new(StageBackend {
        hypothesis: Some(OREO_HYPOTHESIS.into()),
        verification: Some(NO_SOURCES.into()),
        assessment: Some(UNCHANGED_ASSESSMENT.into()),
        ..StageBackend::default()
    })
}

fn manual(brand: &str, product: &str) -> ManualData {
    ManualData {
        brand: Some(brand.into()),
        product_name: Some(product.into()),
        ..ManualData::default()
    }
}

#[tokio::test]
async fn oreo_unsourced_claim_is_penalised() {
    let backend = scripted();
    let determination = pipeline(backend.clone(), None)
        .run(LookupRequest {
            image: None,
            manual: manual("Oreo", "Oreo"),
        })
        .await;

    let hypothesis = determination.hypothesis.clone().unwrap();
    assert_eq!(hypothesis.financial_beneficiary.as_deref(), Some("Mondelez International"));
    assert_eq!(hypothesis.confidence_score, 80);

    let verification = determination.verification.clone().unwrap();
    assert_eq!(verification.verification_status, VerificationStatus::Contradicted);
    assert!(verification.sources.is_empty());
    assert_eq!(verification.confidence_adjustment, -60);

    let assessment = determination.assessment.clone().unwrap();
    assert_eq!(assessment.confidence_assessment.original_confidence, 20);
    assert_eq!(assessment.verification_confidence_change, ConfidenceChange::Unchanged);

    assert_eq!(determination.confidence, 20);
    assert_ne!(determination.confidence, hypothesis.confidence_score);
    assert_eq!(determination.subject_source, SubjectSource::Manual);
    assert_eq!(
        determination.stage_path,
        vec!["knowledge", "verification", "assessment"]
    );
    assert!(!determination.regulated_brand);
    assert!(!determination.reasoning.is_empty());
}

#[tokio::test]
async fn uncorroborated_assessment_cannot_undo_penalty() {
    let backend = Arc::new(StageBackend {
        hypothesis: Some(OREO_HYPOTHESIS.into()),
        verification: Some(NO_SOURCES.into()),
        assessment: Some(INFLATED_ASSESSMENT.into()),
        ..StageBackend::default()
    });
    let determination = pipeline(backend, None)
        .run(LookupRequest {
            image: None,
            manual: manual("Oreo", "Oreo"),
        })
        .await;

    assert_eq!(determination.hypothesis.as_ref().unwrap().confidence_score, 80);
    assert_eq!(determination.verification.as_ref().unwrap().confidence_adjustment, -60);
    assert_eq!(determination.confidence, 20);
    assert_eq!(determination.verification_status, VerificationStatus::InsufficientEvidence);
    let assessment = determination.assessment.unwrap();
    assert_eq!(assessment.verification_confidence_change, ConfidenceChange::Unchanged);
}

#[tokio::test]
async fn failed_hypothesis_is_not_rescued_by_assessment() {
    let backend = Arc::new(StageBackend {
        assessment: Some(INFLATED_ASSESSMENT.into()),
        ..StageBackend::default()
    });
    let determination = pipeline(backend.clone(), None)
        .run(LookupRequest {
            image: None,
            manual: manual("Oreo", "Oreo"),
        })
        .await;

    assert!(determination.financial_beneficiary.is_none());
    assert_eq!(determination.confidence, 0);
    assert_eq!(determination.verification_status, VerificationStatus::InsufficientEvidence);
    assert_eq!(backend.calls(), 1);
    assert_eq!(backend.prompts_containing("ownership research assistant").len(), 1);
    assert_eq!(
        determination.stage_path,
        vec!["knowledge", "verification", "assessment"]
    );
}

#[tokio::test]
async fn failed_vision_without_manual_data_is_unresolved() {
    let backend = scripted();
    let analyzer = ScriptedAnalyzer::new(json!({"success": false, "error": "blurry"}));
    let determination = pipeline(backend.clone(), Some(analyzer.clone()))
        .run(LookupRequest {
            image: Some(image()),
            manual: ManualData::default(),
        })
        .await;

    assert_eq!(analyzer.calls(), 1);
    assert_eq!(backend.calls(), 0);
    let vision = determination.vision.clone().unwrap();
    assert_eq!(vision.confidence, 0.0);
    assert!(vision.needs_escalation);
    assert!(!vision.is_successful());

    assert_eq!(determination.subject_source, SubjectSource::Unresolved);
    assert_eq!(determination.confidence, 0);
    assert_eq!(determination.verification_status, VerificationStatus::InsufficientEvidence);
    assert_eq!(determination.reasoning, "vision_extraction_failed_no_fallback");
    assert_eq!(determination.stage_path, vec!["vision"]);
}

#[tokio::test]
async fn failed_vision_falls_back_to_manual_data() {
    let backend = scripted();
    let analyzer = ScriptedAnalyzer::new(json!({
        "success": true,
        "data": {"brand_name": "Oreo", "confidence": 35}
    }));
    let determination = pipeline(backend.clone(), Some(analyzer))
        .run(LookupRequest {
            image: Some(image()),
            manual: manual("Oreo", "Double Stuf"),
        })
        .await;

    assert_eq!(determination.subject_source, SubjectSource::ManualFallback);
    assert_eq!(determination.identification_confidence, Some(60.0));
    assert_eq!(determination.product.as_deref(), Some("Double Stuf"));
    assert!(determination.merged.is_none());
    let prompts = backend.prompts_containing("Data Source: manual_input");
    assert_eq!(prompts.len(), 1);
}

#[tokio::test]
async fn manual_brand_takes_precedence_over_vision() {
    let backend = scripted();
    let analyzer = ScriptedAnalyzer::new(json!({
        "success": true,
        "data": {
            "brand_name": "ACME Corp",
            "product_name": "Rocket Skates",
            "country_of_origin": "United States",
            "languages": ["en"],
            "confidence": 88,
            "quality_score": 70
        }
    }));
    let determination = pipeline(backend.clone(), Some(analyzer))
        .run(LookupRequest {
            image: Some(image()),
            manual: ManualData {
                brand: Some("Acme".into()),
                confidence: Some(50.0),
                ..ManualData::default()
            },
        })
        .await;

    assert_eq!(determination.subject_source, SubjectSource::Merged);
    let merged = determination.merged.clone().unwrap();
    assert_eq!(merged.brand.as_deref(), Some("Acme"));
    assert_eq!(merged.product_name.as_deref(), Some("Rocket Skates"));
    assert_eq!(merged.confidence, 88.0);
    assert_eq!(determination.brand.as_deref(), Some("Acme"));
    assert_eq!(
        determination.stage_path,
        vec!["vision", "merge", "knowledge", "verification", "assessment"]
    );

    let prompt = backend.prompts_containing("Brand: Acme").pop().unwrap();
    assert!(prompt.contains("Data Source: merged"));
    assert!(prompt.contains("Region Hint: United States"));
}

#[tokio::test]
async fn vision_only_lookup() {
    let backend = scripted();
    let analyzer = ScriptedAnalyzer::new(json!({
        "success": true,
        "contextual_clues": {"extracted_data": {
            "brand_name": "Marabou",
            "product_name": "Mjölkchoklad",
            "confidence": 90
        }}
    }));
    let determination = pipeline(backend.clone(), Some(analyzer))
        .run(LookupRequest {
            image: Some(image()),
            manual: ManualData::default(),
        })
        .await;

    assert_eq!(determination.subject_source, SubjectSource::Vision);
    assert_eq!(determination.identification_confidence, Some(90.0));
    assert_eq!(backend.prompts_containing("Data Source: image_analysis").len(), 1);
}

#[tokio::test]
async fn total_backend_failure_still_determines() {
    let backend = Arc::new(StageBackend::default());
    let determination = pipeline(backend, None)
        .run(LookupRequest {
            image: None,
            manual: manual("Apotek Hjärtat", "Pharmacy ibuprofen"),
        })
        .await;

    assert_eq!(determination.confidence, 0);
    assert_eq!(determination.verification_status, VerificationStatus::InsufficientEvidence);
    assert!(determination.reasoning.contains("Error"));
    assert!(determination.regulated_brand);
    let verification = determination.verification.unwrap();
    assert!(verification.sources.is_empty());
    assert_eq!(verification.confidence_adjustment, 0);
}
