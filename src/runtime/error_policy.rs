//! # Error Policy
//!
//! Maps reconciliation errors onto status conditions and requeue actions.
//!
//! A [`DegradedError`] is not a failure of the controller: the LokiStack is
//! misconfigured, so the cause is recorded as the Degraded condition and the
//! reconciliation ends normally. Any other error is handed back to the caller.

use crate::constants;
use crate::controller::reconciler::{ConditionError, ConditionReconciler, DegradedError};
use crate::controller::store::{ObjectRef, StatusStore};
use anyhow::Context;
use kube_runtime::controller::Action;
use std::time::Duration;
use tracing::warn;

/// Record `error` as the Degraded condition of `object`
///
/// Returns a delayed requeue when the error asked for one, otherwise waits
/// for the next change to the resource.
pub async fn handle_degraded_error<S: StatusStore>(
    reconciler: &ConditionReconciler<S>,
    object: &ObjectRef,
    error: &DegradedError,
) -> Result<Action, ConditionError> {
    warn!(
        resource.namespace = %object.namespace,
        resource.name = %object.name,
        reason = %error.reason,
        requeue = error.requeue,
        "LokiStack {}",
        error
    );

    reconciler
        .set_degraded(object, &error.message, error.reason.clone())
        .await?;

    Ok(requeue_action(error))
}

/// Route a reconciliation error: degraded causes become the Degraded
/// condition, everything else is returned unchanged
///
/// The error chain is searched, so a [`DegradedError`] wrapped with
/// additional context is still recognised.
pub async fn degraded_or_error<S: StatusStore>(
    reconciler: &ConditionReconciler<S>,
    object: &ObjectRef,
    error: anyhow::Error,
) -> anyhow::Result<Action> {
    let degraded = error
        .chain()
        .find_map(|err| err.downcast_ref::<DegradedError>())
        .cloned();

    match degraded {
        Some(degraded) => handle_degraded_error(reconciler, object, &degraded)
            .await
            .context("error setting degraded condition"),
        None => Err(error),
    }
}

fn requeue_action(error: &DegradedError) -> Action {
    if error.requeue {
        Action::requeue(Duration::from_secs(constants::DEFAULT_DEGRADED_REQUEUE_SECS))
    } else {
        Action::await_change()
    }
}
