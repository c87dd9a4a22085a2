//! Merge run outcome types.

use crate::store::SnapshotId;

/// Counters describing what one merge run saw and kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Parseable batch records folded into the run.
    pub batches: usize,
    /// Items in the written snapshot.
    pub merged: usize,
    /// Items discarded because another item with identical content won.
    pub duplicates_dropped: usize,
    /// Items discarded because their batch carried no score for them.
    pub unscored_dropped: usize,
    /// Stored records skipped as unreadable or malformed.
    pub malformed_skipped: usize,
}

/// Outcome of one merge run.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    /// A snapshot was written.
    Completed {
        /// Identity of the written snapshot.
        snapshot_id: SnapshotId,
        /// Run counters.
        stats: MergeStats,
    },
    /// Nothing was mergeable; no snapshot was written. This is a soft
    /// outcome, not an error.
    Empty {
        /// Stored records skipped as unreadable or malformed.
        malformed_skipped: usize,
    },
}

impl MergeOutcome {
    /// Returns `true` when the run wrote a snapshot.
    pub fn wrote_snapshot(&self) -> bool {
        matches!(self, MergeOutcome::Completed { .. })
    }

    /// Returns the written snapshot's identity, if any.
    pub fn snapshot_id(&self) -> Option<&SnapshotId> {
        match self {
            MergeOutcome::Completed { snapshot_id, .. } => Some(snapshot_id),
            MergeOutcome::Empty { .. } => None,
        }
    }
}
