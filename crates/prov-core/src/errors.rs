//! Extraction error type.
//!
//! Collaborator and configuration errors live in `prov-llm` and `prov-config`.
//! Every stage catches [`ExtractionError`] at its boundary and substitutes its
//! degraded record.

use thiserror::Error;

/// Failure to recover a typed record from free-form model output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// No `{` ... `}` span exists in the text.
    #[error("No JSON object found in model output")]
    NoObject,

    /// A span was found but is not parseable after key normalisation.
    #[error("Malformed object in model output: {0}")]
    Malformed(String),

    /// The parsed value is not an object.
    #[error("Extracted value is not an object")]
    NotAnObject,

    /// The object parsed but a field has the wrong type.
    #[error("Extracted object does not match the expected record: {0}")]
    Schema(String),
}
