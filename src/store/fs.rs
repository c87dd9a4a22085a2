//! Directory-backed stores (one JSON file per record).
//!
//! Layout: a flat directory per store, one pretty-printed JSON file per
//! record, named `<UTC timestamp>-<counter>.json`. Writes go to a temp file
//! first, fsync, then rename, so a crash mid-write never leaves a
//! half-visible record. Foreign files in the directory are ignored by
//! listing and counted as skips only when they carry the record extension
//! but do not parse.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::constants::{RECORD_EXTENSION, TEMP_EXTENSION};

use super::error::{StoreError, StoreResult};
use super::model::{BatchId, BatchRecord, Snapshot, SnapshotId};
use super::{BatchListing, BatchStore, SnapshotStore, StorePurge, StoredBatch, timestamp_id};

const MINT_RETRIES: usize = 8;

/// File-backed [`BatchStore`].
#[derive(Debug, Clone)]
pub struct FsBatchStore {
    root: PathBuf,
    seq: Arc<AtomicU64>,
}

impl FsBatchStore {
    /// Creates a store rooted at `root` (created lazily on first append).
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ensures the root directory exists.
    pub async fn ensure_root(&self) -> StoreResult<()> {
        ensure_dir(&self.root).await
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.{}", id, RECORD_EXTENSION))
    }
}

impl BatchStore for FsBatchStore {
    async fn append(&self, record: &BatchRecord) -> StoreResult<BatchId> {
        self.ensure_root().await?;

        let bytes = serde_json::to_vec_pretty(record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        // The counter keeps same-instant appends distinct within this
        // process; the exists check guards a counter reset across restarts
        // landing on an already used timestamp.
        let mut last_id = String::new();
        for _ in 0..MINT_RETRIES {
            let id = timestamp_id(record.created_at, self.seq.fetch_add(1, Ordering::Relaxed));
            let path = self.record_path(&id);
            if tokio::fs::try_exists(&path).await? {
                debug!(id = %id, "record id already on disk, re-minting");
                last_id = id;
                continue;
            }
            write_atomic(&path, &bytes).await?;
            debug!(id = %id, bytes = bytes.len(), "batch record appended");
            return Ok(BatchId::new(id));
        }

        Err(StoreError::IdExhausted { id: last_id })
    }

    async fn list_all(&self) -> StoreResult<BatchListing> {
        let mut listing = BatchListing::default();

        if !tokio::fs::try_exists(&self.root).await? {
            return Ok(listing);
        }

        let mut dir = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            let Some(id) = record_stem(&path) else {
                continue;
            };

            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(id = %id, error = %e, "stored batch unreadable, skipping");
                    listing.malformed += 1;
                    continue;
                }
            };

            match serde_json::from_slice::<BatchRecord>(&bytes) {
                Ok(record) => listing.batches.push(StoredBatch {
                    id: BatchId::new(id),
                    record,
                }),
                Err(e) => {
                    warn!(id = %id, error = %e, "stored batch malformed, skipping");
                    listing.malformed += 1;
                }
            }
        }

        Ok(listing)
    }

    async fn purge(&self) -> StoreResult<StorePurge> {
        purge_dir(&self.root).await
    }
}

/// File-backed [`SnapshotStore`].
#[derive(Debug, Clone)]
pub struct FsSnapshotStore {
    root: PathBuf,
    seq: Arc<AtomicU64>,
}

impl FsSnapshotStore {
    /// Creates a store rooted at `root` (created lazily on first write).
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ensures the root directory exists.
    pub async fn ensure_root(&self) -> StoreResult<()> {
        ensure_dir(&self.root).await
    }

    fn snapshot_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.{}", id, RECORD_EXTENSION))
    }
}

impl SnapshotStore for FsSnapshotStore {
    async fn write(&self, snapshot: &Snapshot) -> StoreResult<SnapshotId> {
        self.ensure_root().await?;

        let bytes = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let mut last_id = String::new();
        for _ in 0..MINT_RETRIES {
            let id = timestamp_id(snapshot.generated_at, self.seq.fetch_add(1, Ordering::Relaxed));
            let path = self.snapshot_path(&id);
            if tokio::fs::try_exists(&path).await? {
                debug!(id = %id, "snapshot id already on disk, re-minting");
                last_id = id;
                continue;
            }
            write_atomic(&path, &bytes).await?;
            debug!(id = %id, bytes = bytes.len(), "snapshot written");
            return Ok(SnapshotId::new(id));
        }

        Err(StoreError::IdExhausted { id: last_id })
    }

    async fn latest(&self) -> StoreResult<Option<Snapshot>> {
        if !tokio::fs::try_exists(&self.root).await? {
            return Ok(None);
        }

        let mut newest: Option<(String, PathBuf)> = None;
        let mut dir = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            let Some(id) = record_stem(&path) else {
                continue;
            };
            if newest.as_ref().is_none_or(|(max, _)| id > *max) {
                newest = Some((id, path));
            }
        }

        let Some((id, path)) = newest else {
            return Ok(None);
        };

        let bytes = tokio::fs::read(&path).await?;
        let snapshot =
            serde_json::from_slice::<Snapshot>(&bytes).map_err(|e| StoreError::MalformedRecord {
                id,
                reason: e.to_string(),
            })?;

        Ok(Some(snapshot))
    }

    async fn purge(&self) -> StoreResult<StorePurge> {
        purge_dir(&self.root).await
    }
}

async fn ensure_dir(path: &Path) -> StoreResult<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| StoreError::Unavailable {
            path: path.to_path_buf(),
            source,
        })
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let temp_path = path.with_extension(TEMP_EXTENSION);

    {
        let mut file = tokio::fs::File::create(&temp_path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
    }

    tokio::fs::rename(&temp_path, path).await?;
    Ok(())
}

/// Returns the file stem when `path` looks like a record file.
fn record_stem(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    let ext = path.extension()?;
    if ext != RECORD_EXTENSION {
        return None;
    }
    Some(path.file_stem()?.to_str()?.to_string())
}

/// Removes every regular file under `root`, counting successes and failures
/// independently so a partial deletion is never reported as a clean purge.
async fn purge_dir(root: &Path) -> StoreResult<StorePurge> {
    let mut purge = StorePurge::default();

    if !tokio::fs::try_exists(root).await? {
        return Ok(purge);
    }

    let mut dir = tokio::fs::read_dir(root).await?;
    while let Some(entry) = dir.next_entry().await? {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match tokio::fs::remove_file(&path).await {
            Ok(()) => purge.removed += 1,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to remove file during purge");
                purge.failed += 1;
            }
        }
    }

    Ok(purge)
}
