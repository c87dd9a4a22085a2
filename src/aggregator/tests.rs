use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::ingest::{Submission, ValidationError};
use crate::store::{Comment, MemoryBatchStore, MemorySnapshotStore};

fn test_comment(id: u32, content: &str) -> Comment {
    Comment {
        id,
        time_ago_days: "1".to_string(),
        content: content.to_string(),
        likes: "3".to_string(),
        replies: "0".to_string(),
        is_pinned: false,
    }
}

fn submission(items: Vec<Comment>) -> Submission {
    let scores = items
        .iter()
        .map(|item| (item.id.to_string(), 50.0 + f64::from(item.id)))
        .collect::<HashMap<_, _>>();
    Submission::new(items, scores)
}

fn memory_aggregator(
    delay: Duration,
) -> (
    Aggregator<MemoryBatchStore, MemorySnapshotStore>,
    Arc<MemoryBatchStore>,
    Arc<MemorySnapshotStore>,
) {
    let batches = Arc::new(MemoryBatchStore::new());
    let snapshots = Arc::new(MemorySnapshotStore::new());
    let aggregator = Aggregator::new(Arc::clone(&batches), Arc::clone(&snapshots), delay);
    (aggregator, batches, snapshots)
}

async fn wait_for_snapshot(
    aggregator: &Aggregator<MemoryBatchStore, MemorySnapshotStore>,
) -> crate::store::Snapshot {
    for _ in 0..200 {
        if let Some(snapshot) = aggregator
            .latest_snapshot()
            .await
            .expect("Failed to fetch latest")
        {
            return snapshot;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("background merge never produced a snapshot");
}

#[tokio::test]
async fn test_submit_persists_and_background_merge_snapshots() {
    let (aggregator, batches, _snapshots) = memory_aggregator(Duration::from_millis(5));

    let id = aggregator
        .submit(submission(vec![
            test_comment(1, "first"),
            test_comment(2, "second"),
        ]))
        .await
        .expect("Submit failed");

    assert_eq!(batches.len(), 1);
    assert!(!id.as_str().is_empty());

    let snapshot = wait_for_snapshot(&aggregator).await;
    assert_eq!(snapshot.items.len(), 2);
    assert_eq!(snapshot.items[0].content, "second");

    aggregator.shutdown().await;
}

#[tokio::test]
async fn test_invalid_submission_is_rejected_before_persistence() {
    let (aggregator, batches, snapshots) = memory_aggregator(Duration::from_millis(5));

    let result = aggregator.submit(Submission::default()).await;

    assert!(matches!(
        result,
        Err(SubmitError::Validation(ValidationError::EmptyBatch))
    ));
    assert!(batches.is_empty());
    assert!(snapshots.is_empty());

    aggregator.shutdown().await;
}

#[tokio::test]
async fn test_latest_snapshot_is_none_before_first_merge() {
    let (aggregator, _batches, _snapshots) = memory_aggregator(Duration::from_millis(5));

    let latest = aggregator
        .latest_snapshot()
        .await
        .expect("Failed to fetch latest");
    assert!(latest.is_none());

    aggregator.shutdown().await;
}

#[tokio::test]
async fn test_merge_now_bypasses_worker_delay() {
    let (aggregator, _batches, snapshots) = memory_aggregator(Duration::from_secs(3600));

    aggregator
        .submit(submission(vec![test_comment(1, "immediate")]))
        .await
        .expect("Submit failed");

    let outcome = aggregator.merge_now().await.expect("Merge failed");
    assert!(outcome.wrote_snapshot());
    assert_eq!(snapshots.len(), 1);

    // No shutdown: the worker is parked in its hour-long delay and shutdown
    // waits for queued runs to finish. Dropping the aggregator is enough.
}

#[tokio::test]
async fn test_overlapping_submissions_dedup_across_batches() {
    let (aggregator, _batches, _snapshots) = memory_aggregator(Duration::from_millis(5));

    aggregator
        .submit(Submission::new(
            vec![test_comment(1, "X"), test_comment(2, "Y")],
            HashMap::from([("1".to_string(), 40.0), ("2".to_string(), 90.0)]),
        ))
        .await
        .expect("Submit failed");
    aggregator
        .submit(Submission::new(
            vec![test_comment(5, "X")],
            HashMap::from([("5".to_string(), 70.0)]),
        ))
        .await
        .expect("Submit failed");

    let outcome = aggregator.merge_now().await.expect("Merge failed");
    assert!(outcome.wrote_snapshot());

    let snapshot = aggregator
        .latest_snapshot()
        .await
        .expect("Failed to fetch latest")
        .expect("Expected a snapshot");
    let ranked: Vec<(&str, f64)> = snapshot
        .items
        .iter()
        .map(|i| (i.content.as_str(), i.final_score))
        .collect();
    assert_eq!(ranked, vec![("Y", 90.0), ("X", 70.0)]);

    aggregator.shutdown().await;
}

#[tokio::test]
async fn test_pinned_item_leads_the_snapshot() {
    let (aggregator, _batches, _snapshots) = memory_aggregator(Duration::from_millis(5));

    let mut pinned = test_comment(3, "pinned announcement");
    pinned.is_pinned = true;

    aggregator
        .submit(Submission::new(
            vec![test_comment(1, "organic favorite"), pinned],
            HashMap::from([("1".to_string(), 100.0)]),
        ))
        .await
        .expect("Submit failed");

    aggregator.merge_now().await.expect("Merge failed");

    let snapshot = aggregator
        .latest_snapshot()
        .await
        .expect("Failed to fetch latest")
        .expect("Expected a snapshot");
    assert_eq!(snapshot.items[0].content, "pinned announcement");
    assert!(snapshot.items[0].final_score > 100.0);

    aggregator.shutdown().await;
}

#[tokio::test]
async fn test_purge_resets_state_between_runs() {
    // Delay long enough that the background run triggered by submit lands
    // after the purge, where it sees an empty store and no-ops.
    let (aggregator, batches, snapshots) = memory_aggregator(Duration::from_secs(1));

    aggregator
        .submit(submission(vec![test_comment(1, "old topic")]))
        .await
        .expect("Submit failed");
    aggregator.merge_now().await.expect("Merge failed");

    let outcome = aggregator.purge().await;
    assert!(outcome.is_complete());
    assert_eq!(outcome.batches_removed(), 1);
    assert_eq!(outcome.snapshots_removed(), 1);
    assert!(batches.is_empty());
    assert!(snapshots.is_empty());

    let latest = aggregator
        .latest_snapshot()
        .await
        .expect("Failed to fetch latest");
    assert!(latest.is_none());

    aggregator.shutdown().await;
}

#[tokio::test]
async fn test_rapid_submissions_coalesce_into_few_runs() {
    let (aggregator, batches, _snapshots) = memory_aggregator(Duration::from_millis(20));

    for i in 0..10 {
        aggregator
            .submit(submission(vec![test_comment(i, &format!("comment {i}"))]))
            .await
            .expect("Submit failed");
    }
    assert_eq!(batches.len(), 10);

    let snapshot = wait_for_snapshot(&aggregator).await;
    assert!(!snapshot.items.is_empty());

    aggregator.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_completes() {
    let (aggregator, _batches, _snapshots) = memory_aggregator(Duration::from_millis(5));
    aggregator
        .submit(submission(vec![test_comment(1, "final")]))
        .await
        .expect("Submit failed");
    aggregator.shutdown().await;
}
