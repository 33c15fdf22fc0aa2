//! Context Merger.

use prov_core::entities::{ManualData, MergedContext, VisionContext};

fn pick(manual: Option<&String>, vision: Option<&String>) -> Option<String> {
    manual
        .filter(|v| !v.trim().is_empty())
        .or_else(|| vision.filter(|v| !v.trim().is_empty()))
        .cloned()
}

/// Combine a vision context with manually supplied fields.
///
/// A non-empty manual field wins over the vision field. Confidence and
/// quality take the larger of the two sides, so merging never lowers
/// either. Manual hints override vision hints key by key.
#[must_use]
pub fn merge_vision_with_manual(vision: &VisionContext, manual: &ManualData) -> MergedContext {
    let merged = MergedContext {
        brand: pick(manual.brand.as_ref(), vision.brand.as_ref()),
        product_name: pick(manual.product_name.as_ref(), vision.product_name.as_ref()),
        country_of_origin: pick(
            manual.country_of_origin.as_ref(),
            vision.country_of_origin.as_ref(),
        ),
        confidence: vision.confidence.max(manual.confidence.unwrap_or(0.0)),
        quality_score: vision.quality_score.max(manual.quality_score.unwrap_or(0.0)),
        hints: vision.hints().overlay(&manual.hints),
        trace: vision.trace.clone(),
    };
    tracing::debug!(
        brand = ?merged.brand,
        confidence = merged.confidence,
        "merge: vision and manual data combined"
    );
    merged
}
