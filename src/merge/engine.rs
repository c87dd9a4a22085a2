use std::cmp::Ordering;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::store::{
    BatchStore, MergedItem, Snapshot, SnapshotStore, SnapshotSummary, StoredBatch,
};

use super::error::{MergeError, MergeResult};
use super::types::{MergeOutcome, MergeStats};

/// Produces a single deduplicated, ranked view over all stored batches.
///
/// A run is idempotent: over an unchanged batch store it yields an identical
/// ranked item sequence (timestamps aside). Runs take no isolation guarantee
/// against a concurrent append; a batch landing mid-run is simply picked up
/// by the next run.
pub struct MergeEngine<B, S> {
    batches: Arc<B>,
    snapshots: Arc<S>,
}

impl<B, S> std::fmt::Debug for MergeEngine<B, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MergeEngine").finish_non_exhaustive()
    }
}

impl<B: BatchStore, S: SnapshotStore> MergeEngine<B, S> {
    /// Creates an engine over the given stores.
    pub fn new(batches: Arc<B>, snapshots: Arc<S>) -> Self {
        Self { batches, snapshots }
    }

    /// Returns the batch store.
    pub fn batches(&self) -> &B {
        &self.batches
    }

    /// Returns the snapshot store.
    pub fn snapshots(&self) -> &S {
        &self.snapshots
    }

    /// Executes one merge run: load, flatten, deduplicate, rank, snapshot.
    #[instrument(skip(self))]
    pub async fn run(&self) -> MergeResult<MergeOutcome> {
        let listing = self.batches.list_all().await.map_err(MergeError::Listing)?;

        if listing.malformed > 0 {
            warn!(
                skipped = listing.malformed,
                "skipped unreadable batch records"
            );
        }

        if listing.batches.is_empty() {
            info!("batch store empty, nothing to merge");
            return Ok(MergeOutcome::Empty {
                malformed_skipped: listing.malformed,
            });
        }

        let mut stats = MergeStats {
            batches: listing.batches.len(),
            malformed_skipped: listing.malformed,
            ..MergeStats::default()
        };

        // Fixed iteration order makes the merge reproducible regardless of
        // store enumeration order: ascending created_at, then id (ids embed
        // the mint counter, so same-instant records stay ordered too).
        let mut batches = listing.batches;
        batches.sort_by(|a, b| {
            a.record
                .created_at
                .cmp(&b.record.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut ranked = flatten_and_dedup(&batches, &mut stats);

        if ranked.is_empty() {
            info!(
                unscored_dropped = stats.unscored_dropped,
                "no scored items survived, nothing to merge"
            );
            return Ok(MergeOutcome::Empty {
                malformed_skipped: listing.malformed,
            });
        }

        // Stable sort keeps equal scores in first-encounter order.
        ranked.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(Ordering::Equal)
        });

        stats.merged = ranked.len();

        let summary = SnapshotSummary {
            total_items: ranked.len(),
            source_batches: stats.batches,
            // Sorted descending, so the range is just the two ends.
            min_score: ranked[ranked.len() - 1].final_score,
            max_score: ranked[0].final_score,
        };

        let snapshot = Snapshot {
            generated_at: Utc::now(),
            summary,
            items: ranked,
        };

        let snapshot_id = self
            .snapshots
            .write(&snapshot)
            .await
            .map_err(MergeError::SnapshotWrite)?;

        info!(
            snapshot_id = %snapshot_id,
            merged = stats.merged,
            batches = stats.batches,
            duplicates_dropped = stats.duplicates_dropped,
            unscored_dropped = stats.unscored_dropped,
            "merge run completed"
        );

        Ok(MergeOutcome::Completed { snapshot_id, stats })
    }
}

/// Flattens `batches` (already in the fixed iteration order) into scored
/// items and deduplicates them by exact content.
///
/// When two items share identical content the strictly higher score wins; an
/// exact score tie keeps the first encountered. The winner occupies the
/// position where its content was first seen, so the pre-sort sequence is a
/// function of the iteration order alone.
fn flatten_and_dedup(batches: &[StoredBatch], stats: &mut MergeStats) -> Vec<MergedItem> {
    let mut kept: Vec<MergedItem> = Vec::new();
    let mut by_content: HashMap<String, usize> = HashMap::new();

    for stored in batches {
        for item in &stored.record.items {
            let Some(score) = stored.record.score_for(item) else {
                stats.unscored_dropped += 1;
                debug!(batch = %stored.id, id = item.id, "item has no score entry, dropping");
                continue;
            };

            match by_content.entry(item.content.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(kept.len());
                    kept.push(MergedItem::new(
                        item.clone(),
                        score,
                        stored.record.created_at,
                    ));
                }
                Entry::Occupied(slot) => {
                    stats.duplicates_dropped += 1;
                    let existing = &mut kept[*slot.get()];
                    if score > existing.final_score {
                        *existing =
                            MergedItem::new(item.clone(), score, stored.record.created_at);
                    }
                }
            }
        }
    }

    kept
}
