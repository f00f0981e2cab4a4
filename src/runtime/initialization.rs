//! # Initialization
//!
//! Process setup shared by binaries: rustls crypto provider, tracing
//! subscriber, and metrics registration.

use crate::constants;
use crate::observability;
use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Initialize the process runtime
///
/// This function handles:
/// - rustls crypto provider setup
/// - Tracing subscriber setup
/// - Metrics registration
pub fn initialize() -> Result<()> {
    // Configure rustls crypto provider before any client is built
    // Required for rustls 0.23+ when no default provider is set via features
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| constants::DEFAULT_LOG_FILTER.into()),
        )
        .try_init()
    {
        warn!("Tracing subscriber init returned error (may already be initialized): {}", e);
    }

    observability::metrics::register_metrics().context("Failed to register metrics")?;

    Ok(())
}
