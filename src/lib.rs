//! Tally library crate (used by the request gateway and integration tests).
//!
//! Tally consolidates batches of LLM-scored comments into a single
//! canonical, deduplicated, rank-ordered snapshot. Batches are appended
//! write-once by the gateway; a background worker folds everything stored
//! into a fresh immutable snapshot after each append; an explicit purge
//! resets state between independent collection runs.
//!
//! # Public API Surface
//!
//! ## Facade
//! - [`Aggregator`] - submit / latest snapshot / purge, with the background
//!   merge worker attached
//! - [`SubmitError`] - the only error surface callers see
//!
//! ## Ingest
//! - [`Submission`], [`ValidationError`] - typed gateway hand-off and its
//!   synchronous validation
//!
//! ## Stores
//! - [`BatchStore`], [`SnapshotStore`] - append-only store seams
//! - [`FsBatchStore`], [`FsSnapshotStore`] - directory-of-JSON backends
//! - [`Comment`], [`BatchRecord`], [`MergedItem`], [`Snapshot`],
//!   [`SnapshotSummary`] - persisted model types
//!
//! ## Merge
//! - [`MergeEngine`] - dedup + rank + snapshot in one idempotent run
//! - [`MergeOutcome`], [`MergeStats`] - what a run did
//!
//! ## Configuration & Constants
//! - [`Config`], [`ConfigError`] - `TALLY_*` environment configuration
//! - [`PINNED_SCORE`] - the documented rank-dominant sentinel
//!
//! ## Test/Mock Support
//! In-memory store doubles are available behind
//! `#[cfg(any(test, feature = "mock"))]`.

pub mod aggregator;
pub mod config;
pub mod constants;
pub mod ingest;
pub mod merge;
pub mod purge;
pub mod store;

pub use aggregator::{Aggregator, MergeTrigger, MergeWorker, SubmitError};
pub use config::{Config, ConfigError};
pub use constants::{DEFAULT_MERGE_DELAY_MS, MAX_BATCH_ITEMS, MAX_ORGANIC_SCORE, PINNED_SCORE};
pub use ingest::{Submission, ValidationError};
pub use merge::{MergeEngine, MergeError, MergeOutcome, MergeResult, MergeStats};
pub use purge::{PurgeOutcome, PurgeStatus, purge_all};
#[cfg(any(test, feature = "mock"))]
pub use store::{MemoryBatchStore, MemorySnapshotStore};
pub use store::{
    BatchId, BatchListing, BatchRecord, BatchStore, Comment, FsBatchStore, FsSnapshotStore,
    MergedItem, Snapshot, SnapshotId, SnapshotStore, SnapshotSummary, StoreError, StorePurge,
    StoreResult, StoredBatch,
};
