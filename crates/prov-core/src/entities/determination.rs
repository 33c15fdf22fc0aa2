use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{
    EvidenceAssessment, MergedContext, OwnershipHypothesis, VerificationResult, VisionContext,
};
use crate::enums::{SubjectSource, VerificationStatus};

/// Final ownership determination for one pipeline invocation.
///
/// Always carries a confidence and a reasoning string, even when every
/// backend stage degraded.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct OwnershipDetermination {
    pub product: Option<String>,
    pub brand: Option<String>,
    pub financial_beneficiary: Option<String>,
    pub beneficiary_country: Option<String>,
    pub ownership_structure_type: Option<String>,
    /// Evidence-adjusted confidence, 0–100.
    pub confidence: u8,
    pub verification_status: VerificationStatus,
    pub reasoning: String,
    pub subject_source: SubjectSource,
    /// Confidence in the product/brand identification itself (0–100), when known.
    pub identification_confidence: Option<f64>,
    pub regulated_brand: bool,
    pub hypothesis: Option<OwnershipHypothesis>,
    pub verification: Option<VerificationResult>,
    pub assessment: Option<EvidenceAssessment>,
    pub vision: Option<VisionContext>,
    pub merged: Option<MergedContext>,
    /// Stages that ran, in order.
    pub stage_path: Vec<String>,
    pub determined_at: DateTime<Utc>,
}
