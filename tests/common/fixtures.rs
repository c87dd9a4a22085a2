//! Shared fixtures for integration tests.

use std::collections::HashMap;
use std::time::Duration;

use tally::{Aggregator, BatchStore, Comment, Snapshot, SnapshotStore, Submission};

pub const DEFAULT_SCORE: f64 = 55.0;

/// Builder for test comments.
pub struct CommentBuilder {
    comment: Comment,
}

impl CommentBuilder {
    pub fn new(id: u32) -> Self {
        Self {
            comment: Comment {
                id,
                time_ago_days: "2".to_string(),
                content: format!("comment {id}"),
                likes: "10".to_string(),
                replies: "1".to_string(),
                is_pinned: false,
            },
        }
    }

    pub fn content(mut self, content: &str) -> Self {
        self.comment.content = content.to_string();
        self
    }

    pub fn likes(mut self, likes: &str) -> Self {
        self.comment.likes = likes.to_string();
        self
    }

    pub fn pinned(mut self) -> Self {
        self.comment.is_pinned = true;
        self
    }

    pub fn build(self) -> Comment {
        self.comment
    }
}

/// Builds a submission scoring every item with `DEFAULT_SCORE`.
pub fn uniform_submission(items: Vec<Comment>) -> Submission {
    let scores: HashMap<String, f64> = items
        .iter()
        .map(|item| (item.id.to_string(), DEFAULT_SCORE))
        .collect();
    Submission::new(items, scores)
}

/// Builds a submission from `(comment, score)` pairs.
pub fn scored_submission(scored: Vec<(Comment, f64)>) -> Submission {
    let scores: HashMap<String, f64> = scored
        .iter()
        .map(|(item, score)| (item.id.to_string(), *score))
        .collect();
    let items = scored.into_iter().map(|(item, _)| item).collect();
    Submission::new(items, scores)
}

/// Polls until the background worker has produced a snapshot.
pub async fn wait_for_snapshot<B, S>(aggregator: &Aggregator<B, S>) -> Snapshot
where
    B: BatchStore + 'static,
    S: SnapshotStore + 'static,
{
    for _ in 0..400 {
        if let Some(snapshot) = aggregator
            .latest_snapshot()
            .await
            .expect("Failed to fetch latest snapshot")
        {
            return snapshot;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("background merge never produced a snapshot");
}
