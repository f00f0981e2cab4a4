//! # Degraded Error
//!
//! Error raised by reconciliation steps that found the LokiStack
//! misconfigured or missing a dependency it cannot create itself.

use crate::crd::ConditionReason;
use thiserror::Error;

/// Why the managed LokiStack has an invalid configuration
///
/// Reconciliation code returns this instead of a plain error so the
/// error policy can surface it as the Degraded condition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cluster degraded: {message}")]
pub struct DegradedError {
    /// Human-readable description written to the condition
    pub message: String,
    /// Reason code written to the condition
    pub reason: ConditionReason,
    /// Whether the resource should be reconciled again after a delay
    pub requeue: bool,
}

impl DegradedError {
    pub fn new(message: impl Into<String>, reason: ConditionReason, requeue: bool) -> Self {
        Self {
            message: message.into(),
            reason,
            requeue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = DegradedError::new(
            "Missing object storage secret",
            ConditionReason::MissingObjectStorageSecret,
            false,
        );
        assert_eq!(err.to_string(), "cluster degraded: Missing object storage secret");
    }
}
