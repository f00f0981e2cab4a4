//! # Runtime Module
//!
//! Process setup and the error policy that turns degraded reconciliations
//! into status conditions.

pub mod error_policy;
pub mod initialization;

pub use error_policy::*;
pub use initialization::*;
