//! # Status Store
//!
//! The object-store capability the condition reconciler writes through.
//!
//! [`KubeStatusStore`] talks to the Kubernetes API server. Writes go to the
//! `status` sub-resource as a merge patch that carries the resource version
//! read beforehand, so the API server rejects the write with 409 Conflict if
//! anyone else wrote the object in between.

use crate::constants::FIELD_MANAGER;
use crate::crd::LokiStack;
use async_trait::async_trait;
use kube::api::{Api, Patch, PatchParams};
use kube::Client;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Namespace and name of a LokiStack
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub namespace: String,
    pub name: String,
}

impl ObjectRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Store errors, classified for the retry loop
#[derive(Debug, Error)]
pub enum StoreError {
    /// The resource version changed since the object was read
    #[error("resource version conflict on {object}")]
    Conflict { object: ObjectRef },
    /// The object does not exist (anymore)
    #[error("{object} not found")]
    NotFound { object: ObjectRef },
    /// Any other API failure
    #[error(transparent)]
    Kube(#[from] kube::Error),
}

impl crate::controller::retry::ConflictError for StoreError {
    fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

/// Read and status-write access to LokiStack objects
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Fetch the current object, `None` if it does not exist
    async fn get(&self, object: &ObjectRef) -> Result<Option<LokiStack>, StoreError>;

    /// Write the full status of `stack`, conditioned on the resource version
    /// carried in its metadata
    async fn update_status(&self, object: &ObjectRef, stack: &LokiStack) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: StatusStore + ?Sized> StatusStore for std::sync::Arc<T> {
    async fn get(&self, object: &ObjectRef) -> Result<Option<LokiStack>, StoreError> {
        (**self).get(object).await
    }

    async fn update_status(&self, object: &ObjectRef, stack: &LokiStack) -> Result<(), StoreError> {
        (**self).update_status(object, stack).await
    }
}

/// [`StatusStore`] backed by the Kubernetes API server
#[derive(Clone)]
pub struct KubeStatusStore {
    client: Client,
}

impl fmt::Debug for KubeStatusStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KubeStatusStore").finish_non_exhaustive()
    }
}

impl KubeStatusStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, namespace: &str) -> Api<LokiStack> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl StatusStore for KubeStatusStore {
    async fn get(&self, object: &ObjectRef) -> Result<Option<LokiStack>, StoreError> {
        Ok(self.api(&object.namespace).get_opt(&object.name).await?)
    }

    async fn update_status(&self, object: &ObjectRef, stack: &LokiStack) -> Result<(), StoreError> {
        let patch = status_patch(stack);
        match self
            .api(&object.namespace)
            .patch_status(
                &object.name,
                &PatchParams::apply(FIELD_MANAGER),
                &Patch::Merge(patch),
            )
            .await
        {
            Ok(_) => Ok(()),
            Err(kube::Error::Api(api_err)) if api_err.code == 409 => {
                debug!("Status write for {} conflicted: {}", object, api_err.message);
                Err(StoreError::Conflict {
                    object: object.clone(),
                })
            }
            Err(kube::Error::Api(api_err)) if api_err.code == 404 => Err(StoreError::NotFound {
                object: object.clone(),
            }),
            Err(e) => Err(StoreError::Kube(e)),
        }
    }
}

/// Merge patch replacing the whole status, guarded by the resource version
///
/// JSON merge patches replace arrays wholesale, so the condition ledger is
/// written exactly as computed.
fn status_patch(stack: &LokiStack) -> serde_json::Value {
    let mut patch = serde_json::json!({
        "status": stack.status.clone().unwrap_or_default(),
    });
    if let Some(resource_version) = &stack.metadata.resource_version {
        patch["metadata"] = serde_json::json!({ "resourceVersion": resource_version });
    }
    patch
}
