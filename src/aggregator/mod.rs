//! Aggregator facade: the gateway's single entry point.
//!
//! Ties the stores, the ingest seam, and the background merge worker
//! together. `submit` is the synchronous critical path (validate, append,
//! fire a best-effort merge trigger); everything downstream of the trigger
//! is asynchronous and failure-isolated from callers.

pub mod error;
pub mod worker;

#[cfg(test)]
mod tests;

pub use error::SubmitError;
pub use worker::{MergeTrigger, MergeWorker};

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::ingest::Submission;
use crate::merge::{MergeEngine, MergeOutcome, MergeResult};
use crate::purge::{PurgeOutcome, purge_all};
use crate::store::{
    BatchId, BatchStore, FsBatchStore, FsSnapshotStore, Snapshot, SnapshotStore, StoreResult,
};

/// Request-facing facade over the aggregation engine.
///
/// Constructing an aggregator spawns its merge worker, so it must happen on
/// a tokio runtime. Dropping the aggregator (or calling
/// [`Aggregator::shutdown`]) closes the trigger channel and the worker winds
/// down after finishing any in-flight run.
pub struct Aggregator<B: BatchStore, S: SnapshotStore> {
    batches: Arc<B>,
    snapshots: Arc<S>,
    trigger: MergeTrigger,
    worker: JoinHandle<()>,
}

impl Aggregator<FsBatchStore, FsSnapshotStore> {
    /// Builds a file-backed aggregator from configuration.
    pub fn from_config(config: &Config) -> Self {
        let batches = Arc::new(FsBatchStore::new(config.batch_path.clone()));
        let snapshots = Arc::new(FsSnapshotStore::new(config.snapshot_path.clone()));
        Self::new(batches, snapshots, config.merge_delay())
    }
}

impl<B, S> Aggregator<B, S>
where
    B: BatchStore + 'static,
    S: SnapshotStore + 'static,
{
    /// Creates an aggregator over the given stores and spawns its merge
    /// worker with the given append-to-merge delay.
    pub fn new(batches: Arc<B>, snapshots: Arc<S>, merge_delay: Duration) -> Self {
        let engine = MergeEngine::new(Arc::clone(&batches), Arc::clone(&snapshots));
        let (trigger, worker) = MergeWorker::spawn(engine, merge_delay);

        Self {
            batches,
            snapshots,
            trigger,
            worker,
        }
    }

    /// Returns the batch store.
    pub fn batches(&self) -> &B {
        &self.batches
    }

    /// Returns the snapshot store.
    pub fn snapshots(&self) -> &S {
        &self.snapshots
    }

    /// Validates and persists one scored batch, then queues a background
    /// merge.
    ///
    /// Only this path surfaces errors to the caller; the triggered merge is
    /// best-effort and its failures are observable only through logs and
    /// snapshot staleness.
    #[instrument(skip(self, submission), fields(items = submission.items.len()))]
    pub async fn submit(&self, submission: Submission) -> Result<BatchId, SubmitError> {
        let record = submission.into_record()?;
        let item_count = record.items.len();

        let id = self.batches.append(&record).await?;
        info!(batch_id = %id, items = item_count, "batch appended");

        self.trigger.request();
        Ok(id)
    }

    /// Returns the most recent snapshot, or `None` before the first merge.
    pub async fn latest_snapshot(&self) -> StoreResult<Option<Snapshot>> {
        self.snapshots.latest().await
    }

    /// Runs a merge immediately on the caller's task, bypassing the worker.
    /// Useful for administrative flushes and deterministic tests.
    pub async fn merge_now(&self) -> MergeResult<MergeOutcome> {
        MergeEngine::new(Arc::clone(&self.batches), Arc::clone(&self.snapshots))
            .run()
            .await
    }

    /// Clears all batches and snapshots, reporting per-store counts.
    pub async fn purge(&self) -> PurgeOutcome {
        purge_all(self.batches.as_ref(), self.snapshots.as_ref()).await
    }

    /// Stops the merge worker and waits for queued runs (including their
    /// pre-run delay) to drain.
    pub async fn shutdown(self) {
        drop(self.trigger);
        if let Err(e) = self.worker.await {
            warn!(error = %e, "merge worker did not shut down cleanly");
        }
    }
}
