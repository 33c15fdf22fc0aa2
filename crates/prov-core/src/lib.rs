//! # prov-core
//!
//! Core types and structured-output extraction for provenance.
//!
//! This crate provides the foundational pieces shared by every pipeline stage:
//! - Records for each stage (hypothesis, verification, assessment, vision, merge)
//! - Status enums with lenient parsing of model-reported values
//! - The structured-output extractor for near-JSON model text
//! - The adapter that folds image-analysis output into one canonical shape
//! - Serde helpers that validate field types after structural parsing

pub mod adapter;
pub mod de;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod extract;

pub use errors::ExtractionError;
pub use extract::{extract_object, extract_record};
