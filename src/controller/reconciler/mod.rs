//! # Reconciler
//!
//! Status condition handling for LokiStack resources.
//!
//! - `ledger` - pure transforms over the condition list
//! - `conditions` - the conflict-retried setters
//! - `degraded` - the error type that maps to the Degraded condition

pub mod conditions;
pub mod degraded;
pub mod ledger;

pub use conditions::*;
pub use degraded::DegradedError;
pub use ledger::DesiredCondition;
