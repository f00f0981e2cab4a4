//! # Controller
//!
//! Condition reconciler, the store it writes through, and the conflict
//! retry loop between them.

pub mod reconciler;
pub mod retry;
pub mod store;
