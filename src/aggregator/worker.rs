use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::constants::MERGE_QUEUE_DEPTH;
use crate::merge::{MergeEngine, MergeOutcome};
use crate::store::{BatchStore, SnapshotStore};

/// Best-effort handle for requesting a background merge run.
///
/// Requests never block and never fail the caller: a full queue means a run
/// is already pending (and runs are idempotent, so one run covers any number
/// of triggers), and a closed queue means the worker is gone, which only the
/// logs need to know about.
#[derive(Debug, Clone)]
pub struct MergeTrigger {
    tx: mpsc::Sender<()>,
}

impl MergeTrigger {
    /// Queues a merge run.
    pub fn request(&self) {
        match self.tx.try_send(()) {
            Ok(()) => debug!("merge run queued"),
            Err(mpsc::error::TrySendError::Full(())) => {
                debug!("merge run already pending, trigger dropped");
            }
            Err(mpsc::error::TrySendError::Closed(())) => {
                warn!("merge worker stopped, trigger dropped");
            }
        }
    }
}

/// Single background task that serializes merge runs.
///
/// Merge-and-snapshot is not on any request's critical path: the worker
/// picks up triggers one at a time, waits `delay` so the append that fired
/// the trigger lands durably, coalesces any triggers that arrived meanwhile,
/// then runs the engine. Failures are logged, never propagated; a started
/// run executes to completion or fails outright, with no cancellation.
///
/// The worker stops when every [`MergeTrigger`] clone has been dropped.
pub struct MergeWorker;

impl MergeWorker {
    /// Spawns the worker onto the current tokio runtime.
    pub fn spawn<B, S>(engine: MergeEngine<B, S>, delay: Duration) -> (MergeTrigger, JoinHandle<()>)
    where
        B: BatchStore + 'static,
        S: SnapshotStore + 'static,
    {
        let (tx, mut rx) = mpsc::channel(MERGE_QUEUE_DEPTH);

        let handle = tokio::spawn(async move {
            while rx.recv().await.is_some() {
                tokio::time::sleep(delay).await;

                // One run covers every trigger that queued up while waiting.
                let mut coalesced = 0;
                while rx.try_recv().is_ok() {
                    coalesced += 1;
                }
                if coalesced > 0 {
                    debug!(coalesced, "coalesced pending merge triggers");
                }

                match engine.run().await {
                    Ok(MergeOutcome::Completed { snapshot_id, stats }) => {
                        debug!(snapshot_id = %snapshot_id, merged = stats.merged, "background merge wrote snapshot");
                    }
                    Ok(MergeOutcome::Empty { .. }) => {
                        debug!("background merge had nothing to do");
                    }
                    Err(e) => {
                        warn!(error = %e, "background merge run failed");
                    }
                }
            }

            debug!("merge worker stopped");
        });

        (MergeTrigger { tx }, handle)
    }
}
