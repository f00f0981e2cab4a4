//! # LokiStack Status
//!
//! Conflict-safe management of the status conditions of LokiStack resources.
//!
//! ## Overview
//!
//! A reconciler decides what state a LokiStack is in and calls one of the
//! setters on [`ConditionReconciler`]:
//!
//! - `set_ready` - all components are ready
//! - `set_failed` - some components failed
//! - `set_pending` - some components are waiting on dependencies
//! - `set_degraded` - the configuration is invalid, with a caller-supplied cause
//!
//! Each setter makes its condition the single `True` entry of the status
//! ledger and resets every other entry to `False`. Writes are guarded by the
//! object's resource version and retried on conflict, and a setter whose
//! condition is already active issues no write at all.

pub mod config;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod observability;
pub mod runtime;

// Re-export the main entry points for convenience
pub use controller::reconciler::{ConditionError, ConditionReconciler, DegradedError};
pub use controller::store::{KubeStatusStore, ObjectRef, StatusStore, StoreError};
pub use crd::*;
