//! # prov-pipeline
//!
//! Evidence reconciliation for provenance.
//!
//! Stages, in the order [`OwnershipPipeline`] runs them:
//! - [`VisionContextBuilder`]: packaging analysis into a [`VisionContext`](prov_core::entities::VisionContext)
//! - [`merge_vision_with_manual`]: manual fields over vision fields
//! - [`HypothesisGenerator`]: first-pass ownership claim
//! - [`EvidenceVerifier`]: claim against checkable sources
//! - [`EvidenceAssessor`]: classified evidence and a confidence delta
//!
//! Every stage is infallible at its public boundary. Collaborator failures,
//! timeouts, and unreadable replies become the stage's degraded record, so a
//! lookup always ends in a determination.

pub mod assess;
pub mod knowledge;
pub mod merge;
pub mod orchestrator;
pub mod verify;
pub mod vision;

mod error;
mod prompts;

pub use assess::{AssessmentInput, EvidenceAssessor, is_regulated_brand};
pub use error::StageError;
pub use knowledge::{HypothesisGenerator, SubjectQuery};
pub use merge::merge_vision_with_manual;
pub use orchestrator::{LookupRequest, OwnershipPipeline};
pub use verify::EvidenceVerifier;
pub use vision::{VisionContextBuilder, VisionValidation, validate_vision_context};

use std::future::Future;
use std::time::Duration;

use prov_llm::CollaboratorError;

/// Await a collaborator call under `limit`; expiry is [`StageError::Timeout`].
pub(crate) async fn bounded<T, F>(stage: &'static str, limit: Duration, call: F) -> Result<T, StageError>
where
    F: Future<Output = Result<T, CollaboratorError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(StageError::from),
        Err(_) => Err(StageError::Timeout {
            stage,
            secs: limit.as_secs(),
        }),
    }
}
