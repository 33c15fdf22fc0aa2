use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::adapter::CanonicalAnalysis;

/// Research hints derived from packaging or supplied by hand.
///
/// Each field is present only when it carries information.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProductHints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_of_origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
}

impl ProductHints {
    /// Key-by-key overlay: a field present in `overrides` wins.
    #[must_use]
    pub fn overlay(&self, overrides: &Self) -> Self {
        Self {
            country_of_origin: overrides
                .country_of_origin
                .clone()
                .or_else(|| self.country_of_origin.clone()),
            languages: overrides.languages.clone().or_else(|| self.languages.clone()),
            extracted_text: overrides
                .extracted_text
                .clone()
                .or_else(|| self.extracted_text.clone()),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.country_of_origin.is_none() && self.languages.is_none() && self.extracted_text.is_none()
    }
}

/// Brand, product, and scores pulled out of a [`VisionContext`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct VisionPrimaryData {
    pub brand: Option<String>,
    pub product_name: Option<String>,
    pub country_of_origin: Option<String>,
    pub confidence: f64,
    pub quality_score: f64,
}

/// Normalised reading of product packaging.
///
/// Built once per image analysis and read-only afterwards. The threshold in
/// force when it was built travels with it so [`is_successful`](Self::is_successful)
/// needs no external lookup.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct VisionContext {
    pub brand: Option<String>,
    pub product_name: Option<String>,
    pub country_of_origin: Option<String>,
    pub languages: Vec<String>,
    pub confidence: f64,
    pub reasoning: String,
    pub quality_score: f64,
    pub needs_escalation: bool,
    pub extracted_text: String,
    pub trace: Option<Value>,
    pub confidence_threshold: f64,
}

impl VisionContext {
    /// A context that carries no extraction and asks for alternate handling.
    #[must_use]
    pub fn escalated(reasoning: impl Into<String>, confidence_threshold: f64) -> Self {
        Self {
            brand: None,
            product_name: None,
            country_of_origin: None,
            languages: Vec::new(),
            confidence: 0.0,
            reasoning: reasoning.into(),
            quality_score: 0.0,
            needs_escalation: true,
            extracted_text: String::new(),
            trace: None,
            confidence_threshold,
        }
    }

    /// Build a context from the canonical analysis shape.
    #[must_use]
    pub fn from_analysis(analysis: CanonicalAnalysis, confidence_threshold: f64) -> Self {
        Self {
            brand: analysis.brand,
            product_name: analysis.product_name,
            country_of_origin: analysis.country_of_origin,
            languages: analysis.languages,
            confidence: analysis.confidence,
            reasoning: analysis.reasoning,
            quality_score: analysis.quality_score,
            needs_escalation: analysis.needs_escalation,
            extracted_text: analysis.extracted_text,
            trace: analysis.trace,
            confidence_threshold,
        }
    }

    /// Whether a brand or product name was read.
    #[must_use]
    pub fn has_subject(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.brand) || present(&self.product_name)
    }

    /// Confidence meets the threshold and a brand or product was read.
    #[must_use]
    pub fn is_successful(&self) -> bool {
        self.confidence >= self.confidence_threshold && self.has_subject()
    }

    #[must_use]
    pub fn primary_data(&self) -> VisionPrimaryData {
        VisionPrimaryData {
            brand: self.brand.clone(),
            product_name: self.product_name.clone(),
            country_of_origin: self.country_of_origin.clone(),
            confidence: self.confidence,
            quality_score: self.quality_score,
        }
    }

    /// Hints for downstream research; empty values are omitted.
    #[must_use]
    pub fn hints(&self) -> ProductHints {
        ProductHints {
            country_of_origin: self
                .country_of_origin
                .clone()
                .filter(|c| !c.trim().is_empty()),
            languages: (!self.languages.is_empty()).then(|| self.languages.clone()),
            extracted_text: (!self.extracted_text.trim().is_empty())
                .then(|| self.extracted_text.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn context(confidence: f64, brand: Option<&str>, product: Option<&str>) -> VisionContext {
        VisionContext {
            brand: brand.map(String::from),
            product_name: product.map(String::from),
            confidence,
            needs_escalation: false,
            ..VisionContext::escalated("", 70.0)
        }
    }

    #[rstest]
    #[case(70.0, Some("Oreo"), None, true)]
    #[case(69.0, Some("Oreo"), None, false)]
    #[case(100.0, None, Some("Sandwich Cookies"), true)]
    #[case(95.0, None, None, false)]
    #[case(95.0, Some("  "), None, false)]
    fn success_boundaries(
        #[case] confidence: f64,
        #[case] brand: Option<&str>,
        #[case] product: Option<&str>,
        #[case] expected: bool,
    ) {
        assert_eq!(context(confidence, brand, product).is_successful(), expected);
    }

    #[test]
    fn escalated_is_never_successful() {
        let ctx = VisionContext::escalated("Vision-first pipeline disabled", 70.0);
        assert!(ctx.needs_escalation);
        assert_eq!(ctx.confidence, 0.0);
        assert!(!ctx.is_successful());
    }

    #[test]
    fn hints_omit_empty_fields() {
        let mut ctx = context(80.0, Some("ICA"), None);
        assert!(ctx.hints().is_empty());

        ctx.country_of_origin = Some("Sweden".into());
        ctx.languages = vec!["sv".into(), "en".into()];
        ctx.extracted_text = "ICA Basic".into();
        assert_eq!(
            ctx.hints(),
            ProductHints {
                country_of_origin: Some("Sweden".into()),
                languages: Some(vec!["sv".into(), "en".into()]),
                extracted_text: Some("ICA Basic".into()),
            }
        );
    }

    #[test]
    fn overlay_is_key_by_key() {
        let base = ProductHints {
            country_of_origin: Some("Sweden".into()),
            languages: Some(vec!["sv".into()]),
            extracted_text: Some("ICA".into()),
        };
        let overrides = ProductHints {
            country_of_origin: Some("Norway".into()),
            ..ProductHints::default()
        };
        let merged = base.overlay(&overrides);
        assert_eq!(merged.country_of_origin.as_deref(), Some("Norway"));
        assert_eq!(merged.languages, Some(vec!["sv".to_string()]));
        assert_eq!(merged.extracted_text.as_deref(), Some("ICA"));
    }
}
