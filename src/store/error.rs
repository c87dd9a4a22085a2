//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the batch and snapshot stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store's root directory could not be created or opened.
    #[error("storage unavailable at {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An individual read or write failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A fresh identity could not be minted without colliding with an
    /// existing record. Appends never overwrite, so this aborts the append.
    #[error("could not mint a unique record id (last tried {id})")]
    IdExhausted { id: String },

    /// A stored record exists but does not parse.
    #[error("malformed record {id}: {reason}")]
    MalformedRecord { id: String, reason: String },

    /// A record could not be serialized for writing.
    #[error("serialization failed: {0}")]
    Serialization(String),
}
