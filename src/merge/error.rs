//! Merge engine error types.

use thiserror::Error;

use crate::store::StoreError;

/// Convenience alias for merge operations.
pub type MergeResult<T> = Result<T, MergeError>;

/// Failures that abort a merge run.
///
/// Individual unreadable records do not show up here; they are skipped and
/// counted. A run fails only when the batch store cannot be enumerated at
/// all or the resulting snapshot cannot be written.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The batch store could not be enumerated.
    #[error("failed to list batch store: {0}")]
    Listing(#[source] StoreError),

    /// The snapshot could not be persisted. The merge computation itself is
    /// not retried or rolled back.
    #[error("failed to write snapshot: {0}")]
    SnapshotWrite(#[source] StoreError),
}
