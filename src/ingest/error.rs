//! Submission validation errors.

use thiserror::Error;

/// Rejections surfaced synchronously to the submitter, before any
/// persistence happens.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The submission carried no items.
    #[error("batch is empty")]
    EmptyBatch,

    /// The submission exceeded the per-batch item limit.
    #[error("batch has {count} items, limit is {max}")]
    TooManyItems { count: usize, max: usize },

    /// Two items in the same submission share an id.
    #[error("duplicate item id {id} within batch")]
    DuplicateItemId { id: u32 },

    /// An item's content is empty, which would break content-keyed
    /// deduplication downstream.
    #[error("item {id} has empty content")]
    EmptyContent { id: u32 },
}
