//! In-memory versioned store for exercising the condition reconciler
//!
//! Mimics the API server's optimistic concurrency: every committed write
//! bumps the resource version, and a write carrying a stale version is
//! rejected with a conflict.

#![allow(dead_code, reason = "Not every test binary uses every helper")]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use lokistack_status::{
    Condition, ConditionStatus, LokiStack, LokiStackSpec, LokiStackStatus, ObjectRef,
    ObjectStorageSecretSpec, ObjectStorageSpec, StatusStore, StoreError,
};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct Inner {
    objects: HashMap<ObjectRef, LokiStack>,
    version: u64,
    gets: usize,
    writes: usize,
    rejected_writes: usize,
    committed_active: Vec<String>,
    injected_conflicts: u32,
    fail_next_get: bool,
    fail_next_update: bool,
    delete_on_next_update: bool,
}

/// Versioned in-memory LokiStack store
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with a single object holding `conditions`
    pub fn with_stack(object: &ObjectRef, conditions: Vec<Condition>) -> Self {
        let store = Self::new();
        store.insert(object, conditions);
        store
    }

    pub fn insert(&self, object: &ObjectRef, conditions: Vec<Condition>) {
        let mut inner = self.inner.lock().unwrap();
        inner.version += 1;
        let mut stack = new_stack(object);
        stack.metadata.resource_version = Some(inner.version.to_string());
        stack.status = Some(LokiStackStatus { conditions });
        inner.objects.insert(object.clone(), stack);
    }

    /// Conditions currently stored for `object`
    pub fn conditions(&self, object: &ObjectRef) -> Vec<Condition> {
        let inner = self.inner.lock().unwrap();
        inner
            .objects
            .get(object)
            .and_then(|s| s.status.clone())
            .unwrap_or_default()
            .conditions
    }

    pub fn resource_version(&self, object: &ObjectRef) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        inner
            .objects
            .get(object)
            .and_then(|s| s.metadata.resource_version.clone())
    }

    pub fn gets(&self) -> usize {
        self.inner.lock().unwrap().gets
    }

    /// Number of committed status writes
    pub fn writes(&self) -> usize {
        self.inner.lock().unwrap().writes
    }

    /// Number of status writes rejected for any reason
    pub fn rejected_writes(&self) -> usize {
        self.inner.lock().unwrap().rejected_writes
    }

    /// Active condition type of every committed write, in commit order
    pub fn committed_active(&self) -> Vec<String> {
        self.inner.lock().unwrap().committed_active.clone()
    }

    /// Simulate `count` writes by another actor landing just before ours
    pub fn inject_conflicts(&self, count: u32) {
        self.inner.lock().unwrap().injected_conflicts = count;
    }

    pub fn fail_next_get(&self) {
        self.inner.lock().unwrap().fail_next_get = true;
    }

    pub fn fail_next_update(&self) {
        self.inner.lock().unwrap().fail_next_update = true;
    }

    /// Delete the object right before the next write reaches it
    pub fn delete_on_next_update(&self) {
        self.inner.lock().unwrap().delete_on_next_update = true;
    }
}

#[async_trait]
impl StatusStore for MemoryStore {
    async fn get(&self, object: &ObjectRef) -> Result<Option<LokiStack>, StoreError> {
        // Let concurrent callers interleave between read and write
        tokio::task::yield_now().await;

        let mut inner = self.inner.lock().unwrap();
        inner.gets += 1;
        if std::mem::take(&mut inner.fail_next_get) {
            return Err(transport_error());
        }
        Ok(inner.objects.get(object).cloned())
    }

    async fn update_status(&self, object: &ObjectRef, stack: &LokiStack) -> Result<(), StoreError> {
        tokio::task::yield_now().await;

        let mut inner = self.inner.lock().unwrap();
        if std::mem::take(&mut inner.fail_next_update) {
            inner.rejected_writes += 1;
            return Err(transport_error());
        }
        if std::mem::take(&mut inner.delete_on_next_update) {
            inner.objects.remove(object);
        }
        if inner.injected_conflicts > 0 {
            inner.injected_conflicts -= 1;
            inner.version += 1;
            let version = inner.version.to_string();
            if let Some(current) = inner.objects.get_mut(object) {
                current.metadata.resource_version = Some(version);
            }
        }

        let Some(current_version) = inner
            .objects
            .get(object)
            .map(|s| s.metadata.resource_version.clone())
        else {
            inner.rejected_writes += 1;
            return Err(StoreError::NotFound {
                object: object.clone(),
            });
        };
        if current_version != stack.metadata.resource_version {
            inner.rejected_writes += 1;
            return Err(StoreError::Conflict {
                object: object.clone(),
            });
        }

        inner.version += 1;
        inner.writes += 1;
        let version = inner.version.to_string();
        let active_type = stack
            .status
            .iter()
            .flat_map(|s| s.conditions.iter())
            .find(|c| c.is_true())
            .map(|c| c.r#type.clone())
            .unwrap_or_default();
        inner.committed_active.push(active_type);
        if let Some(current) = inner.objects.get_mut(object) {
            current.status = stack.status.clone();
            current.metadata.resource_version = Some(version);
        }
        Ok(())
    }
}

fn transport_error() -> StoreError {
    let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    StoreError::Kube(kube::Error::SerdeError(source))
}

pub fn new_stack(object: &ObjectRef) -> LokiStack {
    let mut stack = LokiStack::new(
        &object.name,
        LokiStackSpec {
            size: "1x.small".to_string(),
            storage: ObjectStorageSpec {
                secret: ObjectStorageSecretSpec {
                    name: format!("{}-s3", object.name),
                    r#type: "s3".to_string(),
                },
            },
            storage_class_name: "gp3-csi".to_string(),
            replication: None,
        },
    );
    stack.metadata.namespace = Some(object.namespace.clone());
    stack
}

pub fn target() -> ObjectRef {
    ObjectRef::new("openshift-logging", "lokistack-dev")
}

/// A timestamp well in the past
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
}

pub fn condition(kind: &str, status: ConditionStatus, reason: &str, message: &str) -> Condition {
    Condition {
        r#type: kind.to_string(),
        status,
        observed_generation: None,
        last_transition_time: epoch(),
        reason: reason.to_string(),
        message: message.to_string(),
    }
}

pub fn active(conditions: &[Condition]) -> Vec<&Condition> {
    conditions.iter().filter(|c| c.is_true()).collect()
}
