use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::ProductHints;

/// Fields supplied by hand alongside (or instead of) an image.
///
/// Any field may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ManualData {
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub country_of_origin: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub quality_score: Option<f64>,
    #[serde(default)]
    pub hints: ProductHints,
}

impl ManualData {
    /// Whether a brand or product name was supplied.
    #[must_use]
    pub fn has_subject(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.brand) || present(&self.product_name)
    }

    /// Whether nothing at all was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_subject()
            && self.country_of_origin.is_none()
            && self.confidence.is_none()
            && self.quality_score.is_none()
            && self.hints.is_empty()
    }
}

/// Vision context combined with manual data. Recomputed per request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct MergedContext {
    pub brand: Option<String>,
    pub product_name: Option<String>,
    pub country_of_origin: Option<String>,
    pub confidence: f64,
    pub quality_score: f64,
    pub hints: ProductHints,
    pub trace: Option<Value>,
}
