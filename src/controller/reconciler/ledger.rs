//! # Condition Ledger
//!
//! Pure transforms over a LokiStack's condition list.
//!
//! A ledger holds at most one entry with status `True`. [`apply`] restores
//! that property on every call, even when the input was left inconsistent by
//! another writer.

use crate::constants::{MESSAGE_FAILED, MESSAGE_PENDING, MESSAGE_READY};
use crate::crd::{Condition, ConditionReason, ConditionStatus, ConditionType};
use chrono::{DateTime, Utc};

/// The condition a caller wants to be the single active one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredCondition {
    pub condition_type: ConditionType,
    pub reason: ConditionReason,
    pub message: String,
}

impl DesiredCondition {
    pub fn ready() -> Self {
        Self {
            condition_type: ConditionType::Ready,
            reason: ConditionReason::ReadyComponents,
            message: MESSAGE_READY.to_string(),
        }
    }

    pub fn failed() -> Self {
        Self {
            condition_type: ConditionType::Failed,
            reason: ConditionReason::FailedComponents,
            message: MESSAGE_FAILED.to_string(),
        }
    }

    pub fn pending() -> Self {
        Self {
            condition_type: ConditionType::Pending,
            reason: ConditionReason::PendingComponents,
            message: MESSAGE_PENDING.to_string(),
        }
    }

    pub fn degraded(message: impl Into<String>, reason: ConditionReason) -> Self {
        Self {
            condition_type: ConditionType::Degraded,
            reason,
            message: message.into(),
        }
    }

    /// Materialize as an active ledger entry stamped with `now`
    pub fn to_condition(&self, now: DateTime<Utc>) -> Condition {
        Condition {
            r#type: self.condition_type.as_str().to_string(),
            status: ConditionStatus::True,
            observed_generation: None,
            last_transition_time: now,
            reason: self.reason.as_str().to_string(),
            message: self.message.clone(),
        }
    }

    /// Whether `condition` already records this desired state as active
    pub fn is_recorded_by(&self, condition: &Condition) -> bool {
        condition.r#type == self.condition_type.as_str()
            && condition.reason == self.reason.as_str()
            && condition.message == self.message
            && condition.is_true()
    }
}

/// Whether the ledger already holds `desired` as an active entry
pub fn has_active(conditions: &[Condition], desired: &DesiredCondition) -> bool {
    conditions.iter().any(|c| desired.is_recorded_by(c))
}

/// Compute the ledger after making `desired` the single active condition
///
/// Every existing entry is reset to `False` and stamped with `now`. The last
/// entry matching the desired type is then replaced in place, or the desired
/// condition is appended when no such entry exists. Entries are never removed.
pub fn apply(conditions: &[Condition], desired: &DesiredCondition, now: DateTime<Utc>) -> Vec<Condition> {
    let mut ledger: Vec<Condition> = conditions
        .iter()
        .cloned()
        .map(|mut c| {
            c.status = ConditionStatus::False;
            c.last_transition_time = now;
            c
        })
        .collect();

    // Last entry of the desired type is the one overwritten
    let active = desired.to_condition(now);
    match ledger
        .iter()
        .rposition(|c| c.r#type == desired.condition_type.as_str())
    {
        Some(index) => ledger[index] = active,
        None => ledger.push(active),
    }

    ledger
}
