//! Error types for quirks-core

use std::time::Duration;

use thiserror::Error;

/// Errors from a single call to the generation collaborator
///
/// The novelty selector never retries on these; they abort the whole
/// selection and the caller decides what the user sees.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Provider error: {0}")]
    Provider(#[from] quirks_models::Error),

    #[error("Generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Malformed model output: {0}")]
    Malformed(String),
}

/// A difficulty selector outside the recognised tiers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown difficulty: {0} (expected 1-4)")]
pub struct InvalidDifficulty(pub String);
