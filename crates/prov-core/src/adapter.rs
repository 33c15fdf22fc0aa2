//! Image-analysis output adapter.
//!
//! The image-analysis collaborator may place extracted fields under `data`,
//! under `contextual_clues.extracted_data`, or under a legacy top-level
//! `extracted_data`. [`AnalysisPayload`] names which one was found and
//! [`CanonicalAnalysis`] is the single shape the rest of the system reads.
//!
//! ```text
//! ImageAnalysisResponse ──select──▶ AnalysisPayload ──canonicalize──▶ CanonicalAnalysis
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::de;

/// Extracted product fields as the collaborator reports them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExtractedProductData {
    #[serde(default, deserialize_with = "de::opt_text")]
    pub brand_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub country_of_origin: Option<String>,
    #[serde(default, deserialize_with = "de::string_list")]
    pub languages: Vec<String>,
    #[serde(default, deserialize_with = "de::opt_number")]
    pub confidence: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub reasoning: Option<String>,
    #[serde(default, deserialize_with = "de::opt_number")]
    pub quality_score: Option<f64>,
    #[serde(default, deserialize_with = "de::flag")]
    pub needs_escalation: bool,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub extracted_text: Option<String>,
}

/// Nested `contextual_clues` block.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContextualClues {
    #[serde(default)]
    pub extracted_data: Option<ExtractedProductData>,
}

/// Wire shape returned by the image-analysis collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImageAnalysisResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "de::opt_number")]
    pub confidence: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub data: Option<ExtractedProductData>,
    #[serde(default)]
    pub contextual_clues: Option<ContextualClues>,
    #[serde(default)]
    pub extracted_data: Option<ExtractedProductData>,
    #[serde(default)]
    pub image_processing_trace: Option<Value>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub error: Option<String>,
}

/// Which nesting location supplied the extracted fields.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisPayload {
    Direct(ExtractedProductData),
    ContextualClues(ExtractedProductData),
    Legacy(ExtractedProductData),
    Absent,
}

impl AnalysisPayload {
    /// Pick the first present location: `data`, then
    /// `contextual_clues.extracted_data`, then `extracted_data`.
    #[must_use]
    pub fn select(
        data: Option<ExtractedProductData>,
        contextual_clues: Option<ContextualClues>,
        extracted_data: Option<ExtractedProductData>,
    ) -> Self {
        if let Some(data) = data {
            Self::Direct(data)
        } else if let Some(data) = contextual_clues.and_then(|c| c.extracted_data) {
            Self::ContextualClues(data)
        } else if let Some(data) = extracted_data {
            Self::Legacy(data)
        } else {
            Self::Absent
        }
    }

    #[must_use]
    pub const fn location(&self) -> &'static str {
        match self {
            Self::Direct(_) => "data",
            Self::ContextualClues(_) => "contextual_clues.extracted_data",
            Self::Legacy(_) => "extracted_data",
            Self::Absent => "none",
        }
    }

    #[must_use]
    pub fn into_data(self) -> ExtractedProductData {
        match self {
            Self::Direct(data) | Self::ContextualClues(data) | Self::Legacy(data) => data,
            Self::Absent => ExtractedProductData::default(),
        }
    }
}

/// The single internal shape of an image analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalAnalysis {
    pub success: bool,
    pub payload_location: &'static str,
    pub brand: Option<String>,
    pub product_name: Option<String>,
    pub country_of_origin: Option<String>,
    pub languages: Vec<String>,
    /// Clamped to `0..=100`.
    pub confidence: f64,
    pub reasoning: String,
    pub quality_score: f64,
    pub needs_escalation: bool,
    pub extracted_text: String,
    pub trace: Option<Value>,
    pub error: Option<String>,
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

impl From<ImageAnalysisResponse> for CanonicalAnalysis {
    fn from(response: ImageAnalysisResponse) -> Self {
        let payload = AnalysisPayload::select(
            response.data,
            response.contextual_clues,
            response.extracted_data,
        );
        let payload_location = payload.location();
        let data = payload.into_data();

        Self {
            success: response.success,
            payload_location,
            brand: data.brand_name,
            product_name: data.product_name,
            country_of_origin: data.country_of_origin,
            languages: data.languages,
            confidence: clamp_percent(data.confidence.or(response.confidence).unwrap_or(0.0)),
            reasoning: data.reasoning.or(response.reasoning).unwrap_or_default(),
            quality_score: data.quality_score.map_or(0.0, clamp_percent),
            needs_escalation: data.needs_escalation,
            extracted_text: data.extracted_text.unwrap_or_default(),
            trace: response.image_processing_trace,
            error: response.error,
        }
    }
}
