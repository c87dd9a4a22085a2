//! Persisted model types.
//!
//! Everything here is written to disk as JSON with camelCase field names, so
//! the on-disk layout matches the wire shape the gateway submits. Batch files
//! and snapshot files are immutable once written; there is no in-place update
//! anywhere in the crate.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One submitted comment, as handed over by the gateway.
///
/// `id` is unique within a single batch only; the same logical comment can
/// reappear across batches under any id. Merging therefore keys on `content`,
/// never on `id`. The engagement counters are kept as the numeric strings the
/// gateway supplies; nothing in this crate interprets them.
///
/// # Example
/// ```rust
/// use tally::Comment;
///
/// let comment = Comment {
///     id: 7,
///     time_ago_days: "3".to_string(),
///     content: "great point about the outro".to_string(),
///     likes: "120".to_string(),
///     replies: "4".to_string(),
///     is_pinned: false,
/// };
/// assert_eq!(comment.id, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Identifier unique within one batch.
    pub id: u32,
    /// Age of the comment in days, as a numeric string.
    pub time_ago_days: String,
    /// Natural-language text. This is the deduplication key (exact match,
    /// case-sensitive, no normalization).
    pub content: String,
    /// Like count, as a numeric string.
    pub likes: String,
    /// Reply count, as a numeric string.
    pub replies: String,
    /// Set by the gateway for items that bypass scoring entirely.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_pinned: bool,
}

/// One immutable batch of submitted items plus their externally assigned
/// scores.
///
/// `score_map` is decoupled from `items` because scores arrive from an
/// external scoring call keyed by stringified item id. An item with no entry
/// in `score_map` is unscored: the merge drops it rather than defaulting it
/// to zero. The provenance fields are carried for audit and never
/// interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRecord {
    /// Set once when the record is built; immutable thereafter.
    pub created_at: DateTime<Utc>,
    /// Items in original request order.
    pub items: Vec<Comment>,
    /// Assigned score per stringified item id.
    pub score_map: HashMap<String, f64>,
    /// Instruction text used to produce the scores, if the caller supplied it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring_instructions: Option<String>,
    /// Caller-supplied "how many to keep" hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_top_hint: Option<u32>,
}

impl BatchRecord {
    /// Looks up `item`'s score by its stringified id.
    pub fn score_for(&self, item: &Comment) -> Option<f64> {
        self.score_map.get(&item.id.to_string()).copied()
    }
}

/// A comment with its resolved score and originating batch timestamp.
///
/// Produced only by the merge engine and persisted only inside a
/// [`Snapshot`]. Scores above the nominal 0-100 range (the pinned sentinel)
/// are preserved exactly, never clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedItem {
    /// Id the comment had within its originating batch.
    pub id: u32,
    /// Age of the comment in days, as a numeric string.
    pub time_ago_days: String,
    /// Natural-language text (the dedup key).
    pub content: String,
    /// Like count, as a numeric string.
    pub likes: String,
    /// Reply count, as a numeric string.
    pub replies: String,
    /// Whether the item was pinned at submission time.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_pinned: bool,
    /// Resolved score.
    pub final_score: f64,
    /// `created_at` of the batch the item came from.
    #[serde(rename = "sourceBatchTimestamp")]
    pub source_batch: DateTime<Utc>,
}

impl MergedItem {
    /// Stamps `comment` with its resolved score and source batch timestamp.
    pub fn new(comment: Comment, final_score: f64, source_batch: DateTime<Utc>) -> Self {
        Self {
            id: comment.id,
            time_ago_days: comment.time_ago_days,
            content: comment.content,
            likes: comment.likes,
            replies: comment.replies,
            is_pinned: comment.is_pinned,
            final_score,
            source_batch,
        }
    }
}

/// Aggregate statistics over one snapshot's items.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSummary {
    /// Number of items in the snapshot.
    pub total_items: usize,
    /// Number of source batches folded into the run.
    pub source_batches: usize,
    /// Lowest score in the snapshot.
    pub min_score: f64,
    /// Highest score in the snapshot.
    pub max_score: f64,
}

/// One immutable, ranked output of a merge run.
///
/// `items` are sorted descending by `final_score` with a stable sort, so
/// equal-score items keep their relative order from the merge's deterministic
/// iteration. Each run writes a new snapshot; existing snapshots are never
/// overwritten, giving an append-only audit trail of aggregation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// When the merge run produced this snapshot.
    pub generated_at: DateTime<Utc>,
    /// Aggregate statistics for the ranked list.
    pub summary: SnapshotSummary,
    /// Ranked, deduplicated items.
    pub items: Vec<MergedItem>,
}

impl Snapshot {
    /// Returns the best `k` items (the whole list when it has fewer).
    ///
    /// "Top K" reporting is a caller-side truncation of the ranked list; the
    /// engine itself never truncates what it stores.
    pub fn top(&self, k: usize) -> &[MergedItem] {
        &self.items[..k.min(self.items.len())]
    }
}

/// Identity of a stored batch record (its timestamp-derived file stem).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BatchId(String);

impl BatchId {
    /// Wraps an already minted identity string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of a stored snapshot (its timestamp-derived file stem).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SnapshotId(String);

impl SnapshotId {
    /// Wraps an already minted identity string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
