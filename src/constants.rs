//! # Constants
//!
//! Default values and fixed condition messages.

/// Message of the Ready condition
pub const MESSAGE_READY: &str = "All components ready";

/// Message of the Failed condition
pub const MESSAGE_FAILED: &str = "Some LokiStack components failed";

/// Message of the Pending condition
pub const MESSAGE_PENDING: &str = "Some LokiStack components pending on dependencies";

/// Field manager recorded on status writes
pub const FIELD_MANAGER: &str = "lokistack-status";

/// Maximum number of attempts for a conflicting status write
pub const DEFAULT_CONFLICT_RETRY_STEPS: u32 = 5;

/// Delay before the second attempt (milliseconds)
pub const DEFAULT_CONFLICT_RETRY_INITIAL_BACKOFF_MS: u64 = 10;

/// Multiplier applied to the delay after each conflict
pub const DEFAULT_CONFLICT_RETRY_FACTOR: f64 = 2.0;

/// Upper bound on the delay between attempts (milliseconds)
pub const DEFAULT_CONFLICT_RETRY_MAX_BACKOFF_MS: u64 = 1000;

/// Requeue delay for degraded resources that asked to be retried (seconds)
pub const DEFAULT_DEGRADED_REQUEUE_SECS: u64 = 30;

/// Default tracing filter when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "lokistack_status=info";
