//! Collaborator fakes shared by the pipeline integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use prov_config::VisionConfig;
use prov_core::adapter::ImageAnalysisResponse;
use prov_llm::{
    CollaboratorError, CompletionRequest, GenerativeBackend, ImageAnalyzer, ImagePayload,
    SearchSnippet, WebSearch,
};
use prov_pipeline::{
    EvidenceAssessor, EvidenceVerifier, HypothesisGenerator, OwnershipPipeline,
    VisionContextBuilder,
};
use serde_json::Value;

/// Answers each stage's prompt with its own scripted reply.
#[derive(Default)]
pub struct StageBackend {
    pub hypothesis: Option<String>,
    pub verification: Option<String>,
    pub assessment: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl StageBackend {
    pub fn prompts_containing(&self, needle: &str) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.contains(needle))
            .cloned()
            .collect()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerativeBackend for StageBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CollaboratorError> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        let reply = if request.prompt.contains("ownership research assistant") {
            &self.hypothesis
        } else if request.prompt.contains("ownership verification agent") {
            &self.verification
        } else {
            &self.assessment
        };
        reply
            .clone()
            .ok_or_else(|| CollaboratorError::Parse("no scripted reply".into()))
    }
}

pub struct ScriptedAnalyzer {
    pub response: Value,
    pub calls: AtomicUsize,
}

impl ScriptedAnalyzer {
    pub fn new(response: Value) -> Arc<Self> {
        Arc::new(Self {
            response,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageAnalyzer for ScriptedAnalyzer {
    async fn analyze(
        &self,
        _image: &ImagePayload,
    ) -> Result<ImageAnalysisResponse, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        serde_json::from_value(self.response.clone())
            .map_err(|e| CollaboratorError::Parse(e.to_string()))
    }
}

pub struct NoResults;

#[async_trait]
impl WebSearch for NoResults {
    async fn search(&self, _query: &str) -> Result<Vec<SearchSnippet>, CollaboratorError> {
        Ok(Vec::new())
    }
}

pub fn image() -> ImagePayload {
    ImagePayload {
        base64: "AAAA".into(),
        format: "jpeg".into(),
    }
}

pub fn pipeline(backend: Arc<StageBackend>, analyzer: Option<Arc<ScriptedAnalyzer>>) -> OwnershipPipeline {
    let timeout = Duration::from_secs(2);
    let analyzer = analyzer.map(|a| a as Arc<dyn ImageAnalyzer>);
    OwnershipPipeline::new(
        VisionContextBuilder::new(analyzer, Arc::new(VisionConfig::default()), timeout),
        HypothesisGenerator::new(backend.clone(), "claude-test", 512, timeout),
        EvidenceVerifier::new(backend.clone(), "claude-test", 500, timeout, 60),
        EvidenceAssessor::new(backend, Some(Arc::new(NoResults)), "claude-test", 2000, timeout),
    )
}

pub const OREO_HYPOTHESIS: &str = "Based on my knowledge:\n{financial_beneficiary: \"Mondelez International\", \
    beneficiary_country: \"United States\", confidence_score: 80, ownership_structure_type: \"subsidiary\", \
    reasoning: \"Oreo is a Mondelez International brand\"}";

pub const NO_SOURCES: &str = r#"{"verification_status": "contradicted", "sources": [], "evidence_found": "No credible sources found for this brand", "confidence_adjustment": -60, "reasoning": "No real evidence for this brand or company exists in public records or reputable sources."}"#;

pub const UNCHANGED_ASSESSMENT: &str = "```json\n{\"verification_status\": \"insufficient_evidence\", \
    \"confidence_assessment\": {\"original_confidence\": 80, \"verified_confidence\": 80, \"confidence_change\": \"unchanged\"}, \
    \"evidence_analysis\": {\"supporting_evidence\": [], \"contradicting_evidence\": [], \"neutral_evidence\": [], \
    \"missing_evidence\": [\"No web search results\"]}, \"summary\": \"Nothing found\", \"reasoning\": \"No snippets to assess\"}\n```";

pub const INFLATED_ASSESSMENT: &str = r#"{"verification_status": "confirmed", "confidence_assessment": {"verified_confidence": 80}, "evidence_analysis": {"supporting_evidence": ["Oreo is widely known to be a Mondelez brand"]}}"#;
