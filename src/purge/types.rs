//! Purge outcome types.

use crate::store::{StoreError, StorePurge};

/// Result of purging one store.
#[derive(Debug)]
pub enum PurgeStatus {
    /// The store was enumerated and cleared (individual file failures, if
    /// any, are counted inside).
    Cleared(StorePurge),
    /// The store could not be enumerated at all; nothing is known to have
    /// been removed.
    Unavailable(StoreError),
}

impl PurgeStatus {
    /// Files known to have been removed.
    pub fn removed(&self) -> usize {
        match self {
            PurgeStatus::Cleared(purge) => purge.removed,
            PurgeStatus::Unavailable(_) => 0,
        }
    }

    /// Returns `true` when the store was fully cleared with no failures.
    pub fn is_clean(&self) -> bool {
        matches!(self, PurgeStatus::Cleared(purge) if purge.is_clean())
    }
}

/// Combined outcome of purging both stores.
///
/// The two stores are purged independently and each reports its own counts;
/// one store failing never masks what happened to the other.
#[derive(Debug)]
pub struct PurgeOutcome {
    /// What happened to the batch store.
    pub batches: PurgeStatus,
    /// What happened to the snapshot store.
    pub snapshots: PurgeStatus,
}

impl PurgeOutcome {
    /// Returns `true` when both stores were fully cleared.
    pub fn is_complete(&self) -> bool {
        self.batches.is_clean() && self.snapshots.is_clean()
    }

    /// Batch files known to have been removed.
    pub fn batches_removed(&self) -> usize {
        self.batches.removed()
    }

    /// Snapshot files known to have been removed.
    pub fn snapshots_removed(&self) -> usize {
        self.snapshots.removed()
    }
}
