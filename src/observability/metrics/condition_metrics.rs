//! # Condition Metrics
//!
//! Metrics for condition updates: committed writes, idempotent skips,
//! optimistic-concurrency conflicts and failures.

use crate::observability::metrics::registry::REGISTRY;
use anyhow::Result;
use prometheus::{IntCounter, IntCounterVec};
use std::sync::LazyLock;

static CONDITION_UPDATES_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "lokistack_condition_updates_total",
            "Total number of committed status condition writes",
        ),
        &["type"],
    )
    .expect("Failed to create CONDITION_UPDATES_TOTAL metric - this should never happen")
});

static CONDITION_UPDATES_SKIPPED_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "lokistack_condition_updates_skipped_total",
            "Total number of condition updates skipped because the condition was already active",
        ),
        &["type"],
    )
    .expect("Failed to create CONDITION_UPDATES_SKIPPED_TOTAL metric - this should never happen")
});

static CONDITION_CONFLICTS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "lokistack_condition_conflicts_total",
        "Total number of status writes rejected with a resource version conflict",
    )
    .expect("Failed to create CONDITION_CONFLICTS_TOTAL metric - this should never happen")
});

static CONDITION_UPDATE_ERRORS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "lokistack_condition_update_errors_total",
        "Total number of condition updates that returned an error",
    )
    .expect("Failed to create CONDITION_UPDATE_ERRORS_TOTAL metric - this should never happen")
});

/// Register condition metrics with the registry
pub(crate) fn register_condition_metrics() -> Result<()> {
    REGISTRY.register(Box::new(CONDITION_UPDATES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(CONDITION_UPDATES_SKIPPED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(CONDITION_CONFLICTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(CONDITION_UPDATE_ERRORS_TOTAL.clone()))?;
    Ok(())
}

// Public functions for condition metrics

pub fn increment_condition_updates(condition_type: &str) {
    CONDITION_UPDATES_TOTAL
        .with_label_values(&[condition_type])
        .inc();
}

pub fn increment_condition_updates_skipped(condition_type: &str) {
    CONDITION_UPDATES_SKIPPED_TOTAL
        .with_label_values(&[condition_type])
        .inc();
}

pub fn increment_condition_conflicts() {
    CONDITION_CONFLICTS_TOTAL.inc();
}

pub fn increment_condition_update_errors() {
    CONDITION_UPDATE_ERRORS_TOTAL.inc();
}
