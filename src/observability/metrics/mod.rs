//! # Metrics Module
//!
//! Prometheus metrics for monitoring condition updates.
//!
//! ## Sub-modules
//!
//! - `registry` - Metrics registry setup and registration
//! - `condition_metrics` - Condition write, skip, conflict and error counters

pub mod condition_metrics;
pub mod registry;

pub use condition_metrics::*;
pub use registry::*;
