//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants from primary ones to avoid drift.
//!
//! # Score Range Invariants
//!
//! Organic scores live in the nominal `0.0..=100.0` range
//! ([`MAX_ORGANIC_SCORE`]). [`PINNED_SCORE`] deliberately sits one above that
//! ceiling: a pinned item carries a score no organic item can reach, so it
//! sorts first under plain descending score order and the merge engine never
//! needs a separate ranking rule for pinning. This is an intentional overload
//! of the score field (a score that also means "ranking override"); do not
//! clamp stored scores back into the nominal range or the override is lost.

/// Maximum number of items accepted in one submitted batch.
pub const MAX_BATCH_ITEMS: usize = 50;

/// Upper bound of the nominal organic scoring range.
pub const MAX_ORGANIC_SCORE: f64 = 100.0;

/// Sentinel score assigned to pinned items, one above [`MAX_ORGANIC_SCORE`].
pub const PINNED_SCORE: f64 = MAX_ORGANIC_SCORE + 1.0;

const _: () = assert!(PINNED_SCORE > MAX_ORGANIC_SCORE);

/// Delay between an append completing and the triggered merge run starting,
/// letting the append's write land durably before the merge reads it back.
pub const DEFAULT_MERGE_DELAY_MS: u64 = 500;

/// Capacity of the merge worker's trigger channel. Triggers beyond this are
/// dropped; a queued run already covers them since runs are idempotent.
pub const MERGE_QUEUE_DEPTH: usize = 16;

/// File extension for persisted batch record and snapshot files.
pub const RECORD_EXTENSION: &str = "json";

/// Extension used while a record is being written, before the atomic rename.
pub const TEMP_EXTENSION: &str = "json.tmp";
