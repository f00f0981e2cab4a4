//! # Conflict Retry
//!
//! Read-modify-write retry loop for writes guarded by optimistic concurrency.
//!
//! The operation is re-run from scratch on every conflict, so it must re-read
//! whatever state it depends on. Any error that is not a conflict ends the
//! loop immediately.

use crate::config::RetryConfig;
use crate::observability::metrics;
use std::future::Future;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can signal an optimistic-concurrency conflict
pub trait ConflictError {
    /// Whether retrying against a fresh read may succeed
    fn is_conflict(&self) -> bool;
}

/// Outcome of a failed retry loop
#[derive(Debug, Error)]
pub enum RetryError<E: std::error::Error + 'static> {
    /// Every attempt hit a conflict
    #[error("gave up after {attempts} conflicting attempts: {last}")]
    Exhausted { attempts: u32, last: E },
    /// An attempt failed with a non-conflict error
    #[error(transparent)]
    Failed(E),
}

/// Run `op` until it succeeds, fails with a non-conflict error, or the
/// attempt budget in `config` is spent.
///
/// `op` receives the 0-indexed attempt number.
pub async fn retry_on_conflict<T, E, F, Fut>(
    config: &RetryConfig,
    mut op: F,
) -> Result<T, RetryError<E>>
where
    E: ConflictError + std::error::Error + 'static,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let steps = config.steps.max(1);
    let mut attempt = 0;
    loop {
        let delay = config.backoff_for_attempt(attempt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_conflict() => {
                metrics::increment_condition_conflicts();
                attempt += 1;
                if attempt >= steps {
                    warn!(attempts = attempt, "Conflict retry budget exhausted: {}", e);
                    return Err(RetryError::Exhausted { attempts: attempt, last: e });
                }
                debug!(attempt, "Write conflicted, retrying against a fresh read");
            }
            Err(e) => return Err(RetryError::Failed(e)),
        }
    }
}
