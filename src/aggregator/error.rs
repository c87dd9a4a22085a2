//! Submission path errors.

use thiserror::Error;

use crate::ingest::ValidationError;
use crate::store::StoreError;

/// Failures surfaced to the submitter.
///
/// This is the only place engine errors reach an external caller; merge and
/// snapshot failures stay in the background worker's logs.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The submission was rejected before any persistence.
    #[error("invalid batch: {0}")]
    Validation(#[from] ValidationError),

    /// The batch could not be persisted. The batch is considered lost; it is
    /// not retried.
    #[error("failed to persist batch: {0}")]
    Store(#[from] StoreError),
}
