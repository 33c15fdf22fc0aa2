//! Status enums for verification, evidence, and subject resolution.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Values reported by a generative backend are parsed leniently with
//! `from_backend`; anything unrecognised collapses to the conservative variant.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalise a model-reported label: trim, lowercase, `-` and spaces to `_`.
fn normalize_label(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// VerificationStatus
// ---------------------------------------------------------------------------

/// Outcome of checking an ownership hypothesis against evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Confirmed,
    Contradicted,
    InsufficientEvidence,
}

impl VerificationStatus {
    /// Parse a status string returned by a backend.
    ///
    /// `mixed_evidence` and any other unknown label map to
    /// [`Self::InsufficientEvidence`].
    #[must_use]
    pub fn from_backend(raw: &str) -> Self {
        match normalize_label(raw).as_str() {
            "confirmed" => Self::Confirmed,
            "contradicted" => Self::Contradicted,
            _ => Self::InsufficientEvidence,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Contradicted => "contradicted",
            Self::InsufficientEvidence => "insufficient_evidence",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ConfidenceChange
// ---------------------------------------------------------------------------

/// Direction of a confidence move between two stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceChange {
    Increased,
    Decreased,
    Unchanged,
}

impl ConfidenceChange {
    /// Classify a signed delta.
    #[must_use]
    pub const fn from_delta(delta: i32) -> Self {
        if delta > 0 {
            Self::Increased
        } else if delta < 0 {
            Self::Decreased
        } else {
            Self::Unchanged
        }
    }

    /// Classify the move from `original` to `verified`.
    #[must_use]
    pub fn between(original: u8, verified: u8) -> Self {
        Self::from_delta(i32::from(verified) - i32::from(original))
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Increased => "increased",
            Self::Decreased => "decreased",
            Self::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for ConfidenceChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EvidenceBucket
// ---------------------------------------------------------------------------

/// Classification of one piece of evidence relative to a hypothesis.
///
/// The declaration order is also the precedence used to keep buckets disjoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceBucket {
    Supporting,
    Contradicting,
    Neutral,
    Missing,
}

impl EvidenceBucket {
    pub const ALL: [Self; 4] = [
        Self::Supporting,
        Self::Contradicting,
        Self::Neutral,
        Self::Missing,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Supporting => "supporting",
            Self::Contradicting => "contradicting",
            Self::Neutral => "neutral",
            Self::Missing => "missing",
        }
    }
}

impl fmt::Display for EvidenceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SubjectSource
// ---------------------------------------------------------------------------

/// Where the product/brand pair fed to the hypothesis stage came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubjectSource {
    /// Vision context alone.
    Vision,
    /// Vision context combined with manual data.
    Merged,
    /// Vision was attempted and failed; manual data used instead.
    ManualFallback,
    /// No image supplied; manual data only.
    Manual,
    /// Nothing usable from either side.
    Unresolved,
}

impl SubjectSource {
    /// Tag passed to the hypothesis prompt as the data source.
    #[must_use]
    pub const fn data_source_tag(self) -> Option<&'static str> {
        match self {
            Self::Vision => Some("image_analysis"),
            Self::Merged => Some("merged"),
            Self::ManualFallback | Self::Manual => Some("manual_input"),
            Self::Unresolved => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vision => "vision",
            Self::Merged => "merged",
            Self::ManualFallback => "manual_fallback",
            Self::Manual => "manual",
            Self::Unresolved => "unresolved",
        }
    }
}

impl fmt::Display for SubjectSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
