//! Tests for progress snapshots and the polling watcher

use std::sync::Arc;
use std::time::Duration;

use core_kernel::{AdapterError, AdapterErrorKind, ClaimId};
use domain_claims::progress::{Stage, Tone};
use domain_claims::tracking::{ProgressTracker, MIN_POLL_INTERVAL};
use test_utils::{
    assert_all_tones, assert_stage_tone, ClaimFixtures, EventFixtures, InMemoryClaimStore,
    StubWorkflowEngine, WorkflowFixtures,
};

fn tracker(store: &Arc<InMemoryClaimStore>, workflow: &Arc<StubWorkflowEngine>) -> Arc<ProgressTracker> {
    Arc::new(ProgressTracker::new(store.clone(), workflow.clone()))
}

fn seeded_store() -> Arc<InMemoryClaimStore> {
    let store = InMemoryClaimStore::new();
    store.seed(ClaimFixtures::claim("CLM-1"));
    store.set_history(&ClaimId::new("CLM-1"), EventFixtures::through_fraud());
    Arc::new(store)
}

#[tokio::test]
async fn test_snapshot_waiting_for_documents() {
    let store = seeded_store();
    let workflow = Arc::new(
        StubWorkflowEngine::new(WorkflowFixtures::running("CLM-1", "ut_docs"))
            .with_tasks(vec![WorkflowFixtures::docs_task()]),
    );

    let snapshot = tracker(&store, &workflow).snapshot(&ClaimId::new("CLM-1")).await.unwrap();

    assert_eq!(snapshot.projection.reached, 4);
    assert_stage_tone(&snapshot.projection, Stage::Fraud, Tone::Good);
    assert_stage_tone(&snapshot.projection, Stage::Docs, Tone::Warn);
    assert_eq!(snapshot.tasks.len(), 1);
    assert!(snapshot.now_message.starts_with("Waiting for expert to validate documents"));
    assert!(!snapshot.payment_detected());
}

#[tokio::test]
async fn test_snapshot_of_approved_claim() {
    let store = seeded_store();
    store.set_status(&ClaimId::new("CLM-1"), "APPROVED");
    let workflow = Arc::new(StubWorkflowEngine::new(WorkflowFixtures::finished("CLM-1")));

    let snapshot = tracker(&store, &workflow).snapshot(&ClaimId::new("CLM-1")).await.unwrap();

    assert_all_tones(&snapshot.projection, Tone::Good);
    assert_eq!(snapshot.now_message, "Approved. Payment authorized (demo).");
    assert!(snapshot.payment_detected());
}

#[tokio::test]
async fn test_snapshot_surfaces_adapter_errors() {
    let store = seeded_store();
    let workflow = Arc::new(StubWorkflowEngine::new(WorkflowFixtures::running("CLM-1", "ut_docs")));
    workflow.fail_with(Some(AdapterError::transport("connection refused")));

    let error = tracker(&store, &workflow)
        .snapshot(&ClaimId::new("CLM-1"))
        .await
        .unwrap_err();

    assert_eq!(error.kind, AdapterErrorKind::Transport);
}

#[tokio::test]
async fn test_snapshot_of_unknown_claim_is_protocol_error() {
    let store = seeded_store();
    let workflow = Arc::new(StubWorkflowEngine::new(WorkflowFixtures::running("CLM-1", "ut_docs")));

    let error = tracker(&store, &workflow)
        .snapshot(&ClaimId::new("CLM-404"))
        .await
        .unwrap_err();

    assert_eq!(error.kind, AdapterErrorKind::Protocol);
}

#[tokio::test(start_paused = true)]
async fn test_watch_keeps_polling_after_errors() {
    let store = seeded_store();
    let workflow = Arc::new(StubWorkflowEngine::new(WorkflowFixtures::running("CLM-1", "ut_docs")));
    workflow.fail_with(Some(AdapterError::transport("connection refused")));

    let mut updates = tracker(&store, &workflow).watch(ClaimId::new("CLM-1"), Duration::from_millis(1500));

    let first = updates.recv().await.unwrap();
    assert!(first.is_err());

    workflow.fail_with(None);
    workflow.set_state(WorkflowFixtures::running("CLM-1", "ut_expert"));

    let second = updates.recv().await.unwrap().unwrap();
    assert_eq!(second.projection.reached, 5);
    assert_stage_tone(&second.projection, Stage::Expert, Tone::Warn);
}

#[tokio::test(start_paused = true)]
async fn test_watch_stops_when_receiver_dropped() {
    let store = seeded_store();
    let workflow = Arc::new(StubWorkflowEngine::new(WorkflowFixtures::running("CLM-1", "ut_docs")));

    let mut updates = tracker(&store, &workflow).watch(ClaimId::new("CLM-1"), Duration::from_millis(1500));
    updates.recv().await.unwrap().unwrap();
    drop(updates);

    tokio::time::sleep(Duration::from_secs(10)).await;
    let calls = workflow.calls();
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(workflow.calls(), calls);
}

#[tokio::test(start_paused = true)]
async fn test_watch_with_zero_interval_polls_at_minimum() {
    let store = seeded_store();
    let workflow = Arc::new(StubWorkflowEngine::new(WorkflowFixtures::running("CLM-1", "ut_docs")));

    let mut updates = tracker(&store, &workflow).watch(ClaimId::new("CLM-1"), Duration::ZERO);

    let first = updates.recv().await.unwrap().unwrap();
    let started = tokio::time::Instant::now();
    let second = updates.recv().await.unwrap().unwrap();

    assert_eq!(first.claim.id, ClaimId::new("CLM-1"));
    assert_eq!(second.projection, first.projection);
    assert!(started.elapsed() >= MIN_POLL_INTERVAL - Duration::from_millis(1));
}
