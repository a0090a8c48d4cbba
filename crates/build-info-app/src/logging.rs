//! Subscriber setup for the binary. Library crates only emit `tracing`
//! events; this is the one place that decides where they go.

use tracing_subscriber::EnvFilter;

use crate::AppError;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Installs a compact stderr subscriber honoring `RUST_LOG`.
///
/// # Errors
/// Returns [`AppError::Logging`] when a global subscriber is already set.
pub fn init() -> Result<(), AppError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|error| AppError::Logging(error.to_string()))
}
