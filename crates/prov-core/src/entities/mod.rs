//! Records produced and consumed by the ownership pipeline.
//!
//! Every record is owned by the pipeline invocation that created it and is
//! never mutated after construction; reconciliation builds new records.
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema`.

mod assessment;
mod determination;
mod hypothesis;
mod merged;
mod verification;
mod vision;

pub use assessment::{ConfidenceAssessment, EvidenceAssessment, EvidenceBuckets};
pub use determination::OwnershipDetermination;
pub use hypothesis::OwnershipHypothesis;
pub use merged::{ManualData, MergedContext};
pub use verification::VerificationResult;
pub use vision::{ProductHints, VisionContext, VisionPrimaryData};
