//! Log setup for `sealctl`.
//!
//! stdout is reserved for the sealed or compressed bytes, and the size header
//! shares stderr with the logs. Every event is one JSON object per line, so a
//! caller can tell the two apart on stderr.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Install the global JSON subscriber, writing to stderr.
///
/// `RUST_LOG` overrides `SEALCTL_LOG_LEVEL` when set.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("sealctl logging already initialised: {e}"))
}
