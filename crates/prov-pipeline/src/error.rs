//! Stage error types.

use prov_core::ExtractionError;
use prov_llm::CollaboratorError;
use thiserror::Error;

/// Why a stage fell back to its degraded record.
///
/// Never returned from a public stage method: each stage converts it into
/// the reasoning string of its degraded-default record.
#[derive(Debug, Error)]
pub enum StageError {
    /// The backend reply held no usable record.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The collaborator call failed.
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    /// The collaborator call did not finish in time.
    #[error("{stage} timed out after {secs}s")]
    Timeout { stage: &'static str, secs: u64 },
}
