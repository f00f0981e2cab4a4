//! # Error Policy Tests
//!
//! Verifies that degraded reconciliation errors are recorded as the Degraded
//! condition and mapped to the requested requeue behaviour.

mod support;

use anyhow::Context;
use kube_runtime::controller::Action;
use lokistack_status::constants::{DEFAULT_DEGRADED_REQUEUE_SECS, MESSAGE_READY};
use lokistack_status::runtime::{degraded_or_error, handle_degraded_error};
use lokistack_status::{ConditionReason, ConditionReconciler, ConditionStatus, DegradedError};
use std::sync::Arc;
use std::time::Duration;
use support::{active, condition, target, MemoryStore};

#[tokio::test]
async fn test_degraded_error_sets_condition_and_waits_for_change() {
    let object = target();
    let store = Arc::new(MemoryStore::with_stack(
        &object,
        vec![condition("Ready", ConditionStatus::True, "ReadyComponents", MESSAGE_READY)],
    ));
    let reconciler = ConditionReconciler::new(Arc::clone(&store));
    let error = DegradedError::new(
        "Missing object storage secret",
        ConditionReason::MissingObjectStorageSecret,
        false,
    );

    let action = handle_degraded_error(&reconciler, &object, &error)
        .await
        .unwrap();

    assert_eq!(action, Action::await_change());
    let conditions = store.conditions(&object);
    let active = active(&conditions);
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].r#type, "Degraded");
    assert_eq!(active[0].reason, "MissingObjectStorageSecret");
    assert_eq!(active[0].message, "Missing object storage secret");
}

#[tokio::test]
async fn test_wrapped_degraded_error_is_recognised() {
    let object = target();
    let store = Arc::new(MemoryStore::with_stack(&object, vec![]));
    let reconciler = ConditionReconciler::new(Arc::clone(&store));

    let failure: anyhow::Result<()> = Err(DegradedError::new(
        "Invalid replication factor",
        ConditionReason::InvalidReplicationConfiguration,
        true,
    )
    .into());
    let error = failure.context("failed to build manifests").unwrap_err();

    let action = degraded_or_error(&reconciler, &object, error).await.unwrap();

    assert_eq!(
        action,
        Action::requeue(Duration::from_secs(DEFAULT_DEGRADED_REQUEUE_SECS))
    );
    assert_eq!(store.writes(), 1);
    assert_eq!(store.conditions(&object)[0].reason, "InvalidReplicationConfiguration");
}

#[tokio::test]
async fn test_other_errors_are_passed_through() {
    let object = target();
    let store = Arc::new(MemoryStore::with_stack(&object, vec![]));
    let reconciler = ConditionReconciler::new(Arc::clone(&store));

    let err = degraded_or_error(&reconciler, &object, anyhow::anyhow!("connection reset"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "connection reset");
    assert_eq!(store.writes(), 0);
}

#[tokio::test]
async fn test_failure_to_record_degraded_condition_is_reported() {
    let object = target();
    let store = Arc::new(MemoryStore::with_stack(&object, vec![]));
    store.fail_next_update();
    let reconciler = ConditionReconciler::new(Arc::clone(&store));

    let err = degraded_or_error(
        &reconciler,
        &object,
        DegradedError::new("bad tenants", ConditionReason::InvalidTenantsConfiguration, false).into(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "error setting degraded condition");
}
