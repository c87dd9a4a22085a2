//! Gateway-facing submission validation and batch construction.
//!
//! A [`Submission`] is the typed hand-off from the request gateway: up to
//! [`MAX_BATCH_ITEMS`](crate::constants::MAX_BATCH_ITEMS) items plus the
//! score map an external scoring call produced for them. Validation runs
//! synchronously and rejects before anything is persisted; success yields an
//! immutable [`BatchRecord`] stamped with its creation time.
//!
//! A missing score is deliberately NOT a validation failure. Partial batches
//! are expected (the upstream scorer can fail for a subset of items) and the
//! merge engine silently drops unscored items instead.
//!
//! Pinning is resolved here: every `is_pinned` item gets
//! [`PINNED_SCORE`](crate::constants::PINNED_SCORE) written into the score
//! map, overriding whatever the scorer returned. Downstream components only
//! ever see a score.

pub mod error;


pub use error::ValidationError;

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::constants::{MAX_BATCH_ITEMS, PINNED_SCORE};
use crate::store::{BatchRecord, Comment};

/// One scored batch as submitted by the request gateway.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    /// Items in original request order.
    pub items: Vec<Comment>,
    /// Externally assigned score per stringified item id.
    pub scores: HashMap<String, f64>,
    /// Instruction text used to produce the scores (audit only).
    pub scoring_instructions: Option<String>,
    /// Caller-supplied "how many to keep" hint (audit only).
    pub keep_top_hint: Option<u32>,
}

impl Submission {
    /// Creates a submission with no provenance fields.
    pub fn new(items: Vec<Comment>, scores: HashMap<String, f64>) -> Self {
        Self {
            items,
            scores,
            ..Self::default()
        }
    }

    /// Checks the submission's shape without consuming it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.items.is_empty() {
            return Err(ValidationError::EmptyBatch);
        }

        if self.items.len() > MAX_BATCH_ITEMS {
            return Err(ValidationError::TooManyItems {
                count: self.items.len(),
                max: MAX_BATCH_ITEMS,
            });
        }

        let mut seen = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            if !seen.insert(item.id) {
                return Err(ValidationError::DuplicateItemId { id: item.id });
            }
            if item.content.is_empty() {
                return Err(ValidationError::EmptyContent { id: item.id });
            }
        }

        Ok(())
    }

    /// Validates and builds the immutable record, stamped with the current
    /// time.
    pub fn into_record(self) -> Result<BatchRecord, ValidationError> {
        self.into_record_at(Utc::now())
    }

    /// Validates and builds the immutable record with an explicit creation
    /// time. Useful for replaying recorded traffic and for deterministic
    /// tests.
    pub fn into_record_at(self, created_at: DateTime<Utc>) -> Result<BatchRecord, ValidationError> {
        self.validate()?;

        let mut score_map = self.scores;
        for item in &self.items {
            if item.is_pinned {
                let previous = score_map.insert(item.id.to_string(), PINNED_SCORE);
                if previous.is_some() {
                    debug!(id = item.id, "pinned item score overrides scorer output");
                }
            }
        }

        Ok(BatchRecord {
            created_at,
            items: self.items,
            score_map,
            scoring_instructions: self.scoring_instructions,
            keep_top_hint: self.keep_top_hint,
        })
    }
}
