use thiserror::Error;

use crate::extract::{CadastralNumber, ExtractValidationError};

/// The single error surfaced by the extract save flow.
///
/// Exactly one value reaches the caller per request; which persistence tasks
/// completed before a failure is deliberately not recoverable from it.
#[derive(Debug, Error)]
pub enum SaveExtractError {
    /// An extract with this block number is already archived. Terminal
    /// business outcome, never retried.
    #[error("extract {0} is already archived")]
    AlreadyExists(CadastralNumber),

    /// The upload failed canonicalization; nothing was written.
    #[error(transparent)]
    Validation(#[from] ExtractValidationError),

    /// The shared scope was cancelled before any task failed permanently.
    #[error("save cancelled before completion")]
    Cancelled,

    /// One persistence task exhausted its retry budget; sibling tasks were
    /// cancelled and are not rolled back.
    #[error("{task} failed after {attempts} attempts")]
    TaskFailed {
        task: &'static str,
        attempts: u32,
        #[source]
        source: anyhow::Error,
    },

    /// The existence check failed for a reason other than a duplicate;
    /// propagated unchanged.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
