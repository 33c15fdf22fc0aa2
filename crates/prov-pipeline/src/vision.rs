//! Vision Context Builder.
//!
//! Turns an image into a [`VisionContext`]. The builder never fails: a
//! disabled pipeline, a missing analyzer, an unsuccessful analysis, and a
//! collaborator error all yield an escalated context with confidence 0.

use std::sync::Arc;
use std::time::Duration;

use prov_config::FeatureToggles;
use prov_core::adapter::CanonicalAnalysis;
use prov_core::entities::{ProductHints, VisionContext};
use prov_llm::{ImageAnalyzer, ImagePayload};
use serde::Serialize;

use crate::bounded;

const DISABLED_REASONING: &str = "Vision-first pipeline disabled";
const FAILED_REASONING: &str = "Image analysis failed";

pub struct VisionContextBuilder {
    analyzer: Option<Arc<dyn ImageAnalyzer>>,
    toggles: Arc<dyn FeatureToggles>,
    timeout: Duration,
}

impl VisionContextBuilder {
    /// `analyzer` may be absent when no image-analysis credential is set;
    /// every build then escalates.
    #[must_use]
    pub fn new(
        analyzer: Option<Arc<dyn ImageAnalyzer>>,
        toggles: Arc<dyn FeatureToggles>,
        timeout: Duration,
    ) -> Self {
        Self {
            analyzer,
            toggles,
            timeout,
        }
    }

    /// Analyse `image` and normalise the result.
    ///
    /// `known` carries context the caller already has (country, languages,
    /// text from a barcode lookup). It only fills hint fields the analysis
    /// left empty; brand, product, and confidence come from the image alone.
    pub async fn build(&self, image: &ImagePayload, known: &ProductHints) -> VisionContext {
        let threshold = self.toggles.vision_confidence_threshold();

        if !self.toggles.should_use_vision_first_pipeline() {
            tracing::debug!("vision: pipeline disabled, escalating");
            return VisionContext::escalated(DISABLED_REASONING, threshold);
        }
        let Some(analyzer) = self.analyzer.as_ref() else {
            tracing::warn!("vision: no image analyzer configured, escalating");
            return VisionContext::escalated(
                "Error in vision analysis: image analyzer is not configured",
                threshold,
            );
        };

        let response = match bounded("vision", self.timeout, analyzer.analyze(image)).await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(%error, "vision: analysis call failed");
                return VisionContext::escalated(format!("Error in vision analysis: {error}"), threshold);
            }
        };
        if !response.success {
            tracing::warn!(error = ?response.error, "vision: analysis reported failure");
            return VisionContext::escalated(FAILED_REASONING, threshold);
        }

        let analysis = CanonicalAnalysis::from(response);
        tracing::debug!(
            payload = analysis.payload_location,
            confidence = analysis.confidence,
            "vision: analysis normalised"
        );
        let mut context = VisionContext::from_analysis(analysis, threshold);
        fill_known(&mut context, known);
        context
    }
}

fn fill_known(context: &mut VisionContext, known: &ProductHints) {
    if context.country_of_origin.as_deref().is_none_or(|c| c.trim().is_empty()) {
        context.country_of_origin.clone_from(&known.country_of_origin);
    }
    if context.languages.is_empty() {
        context.languages = known.languages.clone().unwrap_or_default();
    }
    if context.extracted_text.trim().is_empty() {
        context.extracted_text = known.extracted_text.clone().unwrap_or_default();
    }
}

/// Outcome of [`validate_vision_context`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisionValidation {
    pub is_valid: bool,
    pub reason: String,
}

impl VisionValidation {
    fn invalid(reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            reason: reason.into(),
        }
    }
}

/// Decide whether downstream stages may trust a vision context.
#[must_use]
pub fn validate_vision_context(context: Option<&VisionContext>) -> VisionValidation {
    let Some(context) = context else {
        return VisionValidation::invalid("Invalid vision context object");
    };
    if !context.is_successful() {
        return VisionValidation::invalid(format!("Vision extraction failed: {}", context.reasoning));
    }
    if !context.has_subject() {
        return VisionValidation::invalid("No brand or product name extracted");
    }
    VisionValidation {
        is_valid: true,
        reason: String::from("Vision context is valid for ownership research"),
    }
}
