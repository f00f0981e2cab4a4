//! # Condition Reconciler
//!
//! Records the latest health verdict of a LokiStack as its single active
//! status condition.
//!
//! Each setter is idempotent: when the desired condition is already the
//! durable active one, no write is issued. Otherwise the status is rewritten
//! in a read-modify-write loop that re-reads the object on every attempt and
//! retries on resource version conflicts. Conflicts never reach the caller
//! unless the retry budget runs out.

use crate::config::RetryConfig;
use crate::controller::reconciler::ledger::{self, DesiredCondition};
use crate::controller::retry::{retry_on_conflict, ConflictError, RetryError};
use crate::controller::store::{KubeStatusStore, ObjectRef, StatusStore, StoreError};
use crate::crd::{ConditionReason, LokiStackStatus};
use crate::observability::metrics;
use kube::Client;
use thiserror::Error;
use tracing::{debug, info};

/// Failure to record a condition
#[derive(Debug, Error)]
pub enum ConditionError {
    #[error("failed to lookup LokiStack {object}")]
    Lookup {
        object: ObjectRef,
        source: StoreError,
    },
    #[error("failed to update status of LokiStack {object}")]
    Update {
        object: ObjectRef,
        source: StoreError,
    },
    #[error("failed to update status of LokiStack {object}: still conflicting after {attempts} attempts")]
    ConflictRetriesExhausted {
        object: ObjectRef,
        attempts: u32,
        source: StoreError,
    },
}

/// Failure of a single read-modify-write attempt
#[derive(Debug, Error)]
enum AttemptError {
    #[error("lookup failed: {0}")]
    Lookup(StoreError),
    #[error("write failed: {0}")]
    Update(StoreError),
}

impl ConflictError for AttemptError {
    fn is_conflict(&self) -> bool {
        matches!(self, AttemptError::Update(e) if e.is_conflict())
    }
}

enum Commit {
    Written,
    Gone,
}

/// Sets status conditions on LokiStack objects through a [`StatusStore`]
#[derive(Debug, Clone)]
pub struct ConditionReconciler<S> {
    store: S,
    retry: RetryConfig,
}

impl ConditionReconciler<KubeStatusStore> {
    /// Reconciler writing through the Kubernetes API with the retry policy
    /// from the environment
    pub fn from_client(client: Client) -> Self {
        Self::with_retry_config(KubeStatusStore::new(client), RetryConfig::from_env())
    }
}

impl<S: StatusStore> ConditionReconciler<S> {
    pub fn new(store: S) -> Self {
        Self::with_retry_config(store, RetryConfig::default())
    }

    pub fn with_retry_config(store: S, retry: RetryConfig) -> Self {
        Self { store, retry }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Make Ready the active condition, resetting all others to False
    pub async fn set_ready(&self, object: &ObjectRef) -> Result<(), ConditionError> {
        self.update_condition(object, DesiredCondition::ready()).await
    }

    /// Make Failed the active condition, resetting all others to False
    pub async fn set_failed(&self, object: &ObjectRef) -> Result<(), ConditionError> {
        self.update_condition(object, DesiredCondition::failed()).await
    }

    /// Make Pending the active condition, resetting all others to False
    pub async fn set_pending(&self, object: &ObjectRef) -> Result<(), ConditionError> {
        self.update_condition(object, DesiredCondition::pending()).await
    }

    /// Make Degraded the active condition with a caller-supplied cause
    pub async fn set_degraded(
        &self,
        object: &ObjectRef,
        message: &str,
        reason: ConditionReason,
    ) -> Result<(), ConditionError> {
        self.update_condition(object, DesiredCondition::degraded(message, reason))
            .await
    }

    async fn update_condition(
        &self,
        object: &ObjectRef,
        desired: DesiredCondition,
    ) -> Result<(), ConditionError> {
        let condition_type = desired.condition_type.as_str();

        let stack = match self.store.get(object).await {
            Ok(Some(stack)) => stack,
            Ok(None) | Err(StoreError::NotFound { .. }) => {
                debug!("LokiStack {} not found, skipping {} condition", object, condition_type);
                return Ok(());
            }
            Err(source) => {
                metrics::increment_condition_update_errors();
                return Err(ConditionError::Lookup {
                    object: object.clone(),
                    source,
                });
            }
        };

        let conditions = stack
            .status
            .as_ref()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default();
        if ledger::has_active(conditions, &desired) {
            debug!(
                "LokiStack {} already has active {} condition (reason={}), skipping write",
                object, condition_type, desired.reason
            );
            metrics::increment_condition_updates_skipped(condition_type);
            return Ok(());
        }

        let result = retry_on_conflict(&self.retry, |_| self.commit(object, &desired)).await;

        match result {
            Ok(Commit::Written) => {
                info!(
                    resource.namespace = %object.namespace,
                    resource.name = %object.name,
                    reason = %desired.reason,
                    "Set {} condition on LokiStack",
                    condition_type
                );
                metrics::increment_condition_updates(condition_type);
                Ok(())
            }
            Ok(Commit::Gone) => {
                debug!("LokiStack {} was deleted during status update", object);
                Ok(())
            }
            Err(e) => {
                metrics::increment_condition_update_errors();
                Err(match e {
                    RetryError::Exhausted { attempts, last } => {
                        ConditionError::ConflictRetriesExhausted {
                            object: object.clone(),
                            attempts,
                            source: last.into_store_error(),
                        }
                    }
                    RetryError::Failed(AttemptError::Lookup(source)) => ConditionError::Lookup {
                        object: object.clone(),
                        source,
                    },
                    RetryError::Failed(AttemptError::Update(source)) => ConditionError::Update {
                        object: object.clone(),
                        source,
                    },
                })
            }
        }
    }

    /// One read-modify-write attempt against the latest observed version
    async fn commit(
        &self,
        object: &ObjectRef,
        desired: &DesiredCondition,
    ) -> Result<Commit, AttemptError> {
        let mut stack = match self.store.get(object).await {
            Ok(Some(stack)) => stack,
            Ok(None) | Err(StoreError::NotFound { .. }) => return Ok(Commit::Gone),
            Err(e) => return Err(AttemptError::Lookup(e)),
        };

        let now = chrono::Utc::now();
        let previous = stack.status.take().unwrap_or_default().conditions;
        stack.status = Some(LokiStackStatus {
            conditions: ledger::apply(&previous, desired, now),
        });

        match self.store.update_status(object, &stack).await {
            Ok(()) => Ok(Commit::Written),
            Err(StoreError::NotFound { .. }) => Ok(Commit::Gone),
            Err(e) => Err(AttemptError::Update(e)),
        }
    }
}

impl AttemptError {
    fn into_store_error(self) -> StoreError {
        match self {
            AttemptError::Lookup(e) | AttemptError::Update(e) => e,
        }
    }
}

/// Set the Ready condition on a LokiStack through the Kubernetes API
pub async fn set_ready_condition(client: &Client, object: &ObjectRef) -> Result<(), ConditionError> {
    ConditionReconciler::from_client(client.clone())
        .set_ready(object)
        .await
}

/// Set the Failed condition on a LokiStack through the Kubernetes API
pub async fn set_failed_condition(client: &Client, object: &ObjectRef) -> Result<(), ConditionError> {
    ConditionReconciler::from_client(client.clone())
        .set_failed(object)
        .await
}

/// Set the Pending condition on a LokiStack through the Kubernetes API
pub async fn set_pending_condition(
    client: &Client,
    object: &ObjectRef,
) -> Result<(), ConditionError> {
    ConditionReconciler::from_client(client.clone())
        .set_pending(object)
        .await
}

/// Set the Degraded condition on a LokiStack through the Kubernetes API
pub async fn set_degraded_condition(
    client: &Client,
    object: &ObjectRef,
    message: &str,
    reason: ConditionReason,
) -> Result<(), ConditionError> {
    ConditionReconciler::from_client(client.clone())
        .set_degraded(object, message, reason)
        .await
}
