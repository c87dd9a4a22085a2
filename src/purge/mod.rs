//! Full reset of aggregation state between independent collection runs.
//!
//! Purging clears the batch store and the snapshot store and reports what
//! was removed from each, independently. A partial failure is reported as
//! such, never masked as a total success. Purging already-empty stores is a
//! successful no-op with zero counts.

pub mod types;


pub use types::{PurgeOutcome, PurgeStatus};

use tracing::{info, instrument, warn};

use crate::store::{BatchStore, SnapshotStore};

/// Clears both stores and reports per-store removal counts.
#[instrument(skip(batches, snapshots))]
pub async fn purge_all<B: BatchStore, S: SnapshotStore>(
    batches: &B,
    snapshots: &S,
) -> PurgeOutcome {
    let batch_status = match batches.purge().await {
        Ok(purge) => {
            if !purge.is_clean() {
                warn!(failed = purge.failed, "batch purge left files behind");
            }
            PurgeStatus::Cleared(purge)
        }
        Err(e) => {
            warn!(error = %e, "batch store purge failed");
            PurgeStatus::Unavailable(e)
        }
    };

    let snapshot_status = match snapshots.purge().await {
        Ok(purge) => {
            if !purge.is_clean() {
                warn!(failed = purge.failed, "snapshot purge left files behind");
            }
            PurgeStatus::Cleared(purge)
        }
        Err(e) => {
            warn!(error = %e, "snapshot store purge failed");
            PurgeStatus::Unavailable(e)
        }
    };

    let outcome = PurgeOutcome {
        batches: batch_status,
        snapshots: snapshot_status,
    };

    info!(
        batches_removed = outcome.batches_removed(),
        snapshots_removed = outcome.snapshots_removed(),
        complete = outcome.is_complete(),
        "purge finished"
    );

    outcome
}
