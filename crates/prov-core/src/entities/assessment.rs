use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ConfidenceChange, EvidenceBucket, VerificationStatus};

/// Evidence partitioned into four disjoint buckets.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EvidenceBuckets {
    pub supporting: Vec<String>,
    pub contradicting: Vec<String>,
    pub neutral: Vec<String>,
    pub missing: Vec<String>,
}

impl EvidenceBuckets {
    #[must_use]
    pub fn bucket(&self, bucket: EvidenceBucket) -> &[String] {
        match bucket {
            EvidenceBucket::Supporting => &self.supporting,
            EvidenceBucket::Contradicting => &self.contradicting,
            EvidenceBucket::Neutral => &self.neutral,
            EvidenceBucket::Missing => &self.missing,
        }
    }

    fn bucket_mut(&mut self, bucket: EvidenceBucket) -> &mut Vec<String> {
        match bucket {
            EvidenceBucket::Supporting => &mut self.supporting,
            EvidenceBucket::Contradicting => &mut self.contradicting,
            EvidenceBucket::Neutral => &mut self.neutral,
            EvidenceBucket::Missing => &mut self.missing,
        }
    }

    /// Total number of entries across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        EvidenceBucket::ALL.iter().map(|b| self.bucket(*b).len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Trim entries, drop blanks, and drop any entry already placed in an
    /// earlier bucket (supporting, contradicting, neutral, missing).
    #[must_use]
    pub fn into_disjoint(self) -> Self {
        let mut seen = HashSet::new();
        let mut out = Self::default();
        for bucket in EvidenceBucket::ALL {
            for entry in self.bucket(bucket) {
                let entry = entry.trim();
                if entry.is_empty() || !seen.insert(entry.to_lowercase()) {
                    continue;
                }
                out.bucket_mut(bucket).push(entry.to_string());
            }
        }
        out
    }

    /// Buckets holding a single missing-evidence note.
    #[must_use]
    pub fn missing_only(note: impl Into<String>) -> Self {
        Self {
            missing: vec![note.into()],
            ..Self::default()
        }
    }
}

/// Confidence before and after the assessment stage.
///
/// `confidence_change` is always derived from the two numbers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ConfidenceAssessment {
    pub original_confidence: u8,
    pub verified_confidence: u8,
    pub confidence_change: ConfidenceChange,
}

impl ConfidenceAssessment {
    #[must_use]
    pub fn new(original_confidence: u8, verified_confidence: u8) -> Self {
        Self {
            original_confidence,
            verified_confidence,
            confidence_change: ConfidenceChange::between(original_confidence, verified_confidence),
        }
    }

    #[must_use]
    pub fn unchanged(original_confidence: u8) -> Self {
        Self::new(original_confidence, original_confidence)
    }

    /// Signed difference `verified - original`.
    #[must_use]
    pub fn delta(&self) -> i32 {
        i32::from(self.verified_confidence) - i32::from(self.original_confidence)
    }
}

/// Richer second verification pass with classified evidence.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EvidenceAssessment {
    pub verification_status: VerificationStatus,
    pub verification_confidence_change: ConfidenceChange,
    pub evidence: EvidenceBuckets,
    pub confidence_assessment: ConfidenceAssessment,
    pub summary: String,
    pub reasoning: String,
}

impl EvidenceAssessment {
    /// Build an assessment; the change enum is taken from `confidence_assessment`.
    #[must_use]
    pub fn new(
        verification_status: VerificationStatus,
        evidence: EvidenceBuckets,
        confidence_assessment: ConfidenceAssessment,
        summary: impl Into<String>,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            verification_status,
            verification_confidence_change: confidence_assessment.confidence_change,
            evidence: evidence.into_disjoint(),
            confidence_assessment,
            summary: summary.into(),
            reasoning: reasoning.into(),
        }
    }

    /// The record returned when the stage could not run.
    ///
    /// Confidence is carried through unchanged.
    #[must_use]
    pub fn degraded(original_confidence: u8, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self::new(
            VerificationStatus::InsufficientEvidence,
            EvidenceBuckets::missing_only(reason.clone()),
            ConfidenceAssessment::unchanged(original_confidence),
            "Verification failed due to technical error",
            reason,
        )
    }
}
