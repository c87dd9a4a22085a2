//! In-memory store doubles (mock feature).
//!
//! These hold serialized JSON bytes keyed by minted id, mirroring the
//! file-backed layout closely enough that malformed-record handling and
//! identity ordering are testable without touching a filesystem. Available
//! under `#[cfg(any(test, feature = "mock"))]`.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::error::{StoreError, StoreResult};
use super::model::{BatchId, BatchRecord, Snapshot, SnapshotId};
use super::{BatchListing, BatchStore, SnapshotStore, StorePurge, StoredBatch, timestamp_id};

type Entries = Arc<RwLock<BTreeMap<String, Vec<u8>>>>;

fn mint_into(entries: &Entries, seq: &AtomicU64, at: DateTime<Utc>, bytes: Vec<u8>) -> String {
    let mut entries = entries.write();
    loop {
        let id = timestamp_id(at, seq.fetch_add(1, Ordering::Relaxed));
        if entries.contains_key(&id) {
            continue;
        }
        entries.insert(id.clone(), bytes);
        return id;
    }
}

fn purge_entries(entries: &Entries) -> StorePurge {
    let mut entries = entries.write();
    let removed = entries.len();
    entries.clear();
    StorePurge { removed, failed: 0 }
}

/// In-memory [`BatchStore`] double.
#[derive(Debug, Default, Clone)]
pub struct MemoryBatchStore {
    entries: Entries,
    seq: Arc<AtomicU64>,
}

impl MemoryBatchStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts raw bytes under `id`, bypassing serialization. Lets tests
    /// plant malformed records.
    pub fn insert_raw(&self, id: &str, bytes: Vec<u8>) {
        self.entries.write().insert(id.to_string(), bytes);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl BatchStore for MemoryBatchStore {
    async fn append(&self, record: &BatchRecord) -> StoreResult<BatchId> {
        let bytes =
            serde_json::to_vec(record).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let id = mint_into(&self.entries, &self.seq, record.created_at, bytes);
        Ok(BatchId::new(id))
    }

    async fn list_all(&self) -> StoreResult<BatchListing> {
        let entries = self.entries.read();
        let mut listing = BatchListing::default();

        for (id, bytes) in entries.iter() {
            match serde_json::from_slice::<BatchRecord>(bytes) {
                Ok(record) => listing.batches.push(StoredBatch {
                    id: BatchId::new(id.clone()),
                    record,
                }),
                Err(_) => listing.malformed += 1,
            }
        }

        Ok(listing)
    }

    async fn purge(&self) -> StoreResult<StorePurge> {
        Ok(purge_entries(&self.entries))
    }
}

/// In-memory [`SnapshotStore`] double.
#[derive(Debug, Default, Clone)]
pub struct MemorySnapshotStore {
    entries: Entries,
    seq: Arc<AtomicU64>,
}

impl MemorySnapshotStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts raw bytes under `id`, bypassing serialization.
    pub fn insert_raw(&self, id: &str, bytes: Vec<u8>) {
        self.entries.write().insert(id.to_string(), bytes);
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    async fn write(&self, snapshot: &Snapshot) -> StoreResult<SnapshotId> {
        let bytes =
            serde_json::to_vec(snapshot).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let id = mint_into(&self.entries, &self.seq, snapshot.generated_at, bytes);
        Ok(SnapshotId::new(id))
    }

    async fn latest(&self) -> StoreResult<Option<Snapshot>> {
        let entries = self.entries.read();
        let Some((id, bytes)) = entries.last_key_value() else {
            return Ok(None);
        };

        let snapshot =
            serde_json::from_slice::<Snapshot>(bytes).map_err(|e| StoreError::MalformedRecord {
                id: id.clone(),
                reason: e.to_string(),
            })?;

        Ok(Some(snapshot))
    }

    async fn purge(&self) -> StoreResult<StorePurge> {
        Ok(purge_entries(&self.entries))
    }
}
