//! # Observability
//!
//! Prometheus metrics for status condition writes.

pub mod metrics;
