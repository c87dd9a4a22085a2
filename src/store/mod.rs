//! Append-only persistence for batch records and snapshots.
//!
//! Two store seams, each with a file-backed implementation and an in-memory
//! test double behind the `mock` feature:
//!
//! - [`BatchStore`]: write-once batch records, enumerate-all, purge.
//! - [`SnapshotStore`]: write-once snapshots, fetch latest, purge.
//!
//! Identities are minted from the record's UTC timestamp plus a process-wide
//! monotonic counter, so ids sort lexicographically in creation order and two
//! appends within the same timestamp resolution still get distinct names.
//! Stores are only ever appended to or fully purged; nothing mutates a record
//! in place.

pub mod error;
pub mod fs;
#[cfg(any(test, feature = "mock"))]
pub mod memory;
pub mod model;


pub use error::{StoreError, StoreResult};
pub use fs::{FsBatchStore, FsSnapshotStore};
#[cfg(any(test, feature = "mock"))]
pub use memory::{MemoryBatchStore, MemorySnapshotStore};
pub use model::{
    BatchId, BatchRecord, Comment, MergedItem, Snapshot, SnapshotId, SnapshotSummary,
};

use chrono::{DateTime, Utc};

/// One stored record together with its store identity.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredBatch {
    /// Identity the store assigned at append time.
    pub id: BatchId,
    /// The record itself.
    pub record: BatchRecord,
}

/// Result of enumerating a batch store.
///
/// Unreadable or unparseable records are skipped and counted rather than
/// failing the listing; partial batches are expected. Enumeration order is
/// unspecified; callers that need a deterministic order derive it from each
/// record's `created_at`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchListing {
    /// Every record that parsed.
    pub batches: Vec<StoredBatch>,
    /// Count of stored records that were skipped as unreadable or malformed.
    pub malformed: usize,
}

/// Removal counts from purging one store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorePurge {
    /// Files successfully removed.
    pub removed: usize,
    /// Files that could not be removed.
    pub failed: usize,
}

impl StorePurge {
    /// Returns `true` when nothing failed to delete.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Durable, append-only persistence of batch records.
pub trait BatchStore: Send + Sync {
    /// Writes a new record, never overwriting an existing one.
    fn append(
        &self,
        record: &BatchRecord,
    ) -> impl std::future::Future<Output = StoreResult<BatchId>> + Send;

    /// Returns every currently stored record plus a malformed-skip count.
    fn list_all(&self) -> impl std::future::Future<Output = StoreResult<BatchListing>> + Send;

    /// Deletes every stored record, reporting per-file failures rather than
    /// masking them.
    fn purge(&self) -> impl std::future::Future<Output = StoreResult<StorePurge>> + Send;
}

/// Append-only persistence of merge snapshots.
pub trait SnapshotStore: Send + Sync {
    /// Persists a new snapshot, never overwriting an existing one.
    fn write(
        &self,
        snapshot: &Snapshot,
    ) -> impl std::future::Future<Output = StoreResult<SnapshotId>> + Send;

    /// Returns the most recent snapshot by identity ordering, or `None` when
    /// the store is empty.
    fn latest(&self) -> impl std::future::Future<Output = StoreResult<Option<Snapshot>>> + Send;

    /// Deletes every stored snapshot, reporting per-file failures rather than
    /// masking them.
    fn purge(&self) -> impl std::future::Future<Output = StoreResult<StorePurge>> + Send;
}

/// Mints a lexicographically sortable identity from `at` plus a counter
/// value.
///
/// Microsecond precision orders ids chronologically across process restarts;
/// the zero-padded counter keeps same-instant ids distinct and ordered by
/// mint sequence.
pub(crate) fn timestamp_id(at: DateTime<Utc>, seq: u64) -> String {
    format!("{}-{:06}", at.format("%Y%m%dT%H%M%S%.6f"), seq)
}
