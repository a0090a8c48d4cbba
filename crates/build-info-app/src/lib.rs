#![warn(missing_docs)]
//! # build-info-app
//!
//! ## Purpose
//! Orchestrates the build form: draft storage, rendering, downloads, status
//! and the interactive shell.
//!
//! ## Responsibilities
//! - Wire form events to view state, storage and downloads
//!   ([`FormController`]).
//! - Resolve runtime configuration from the environment ([`AppConfig`]).
//! - Install the `tracing` subscriber used by the binary.
//! - Parse and run shell commands standing in for the popup.
//!
//! ## Data flow
//! Shell input -> [`shell::ShellCommand`] -> [`FormController`] ->
//! `build_info_ui::FormView` + draft store + download backend ->
//! lifecycle observer logs created downloads.
//!
//! ## Error model
//! Startup failures are [`AppError`]. Once the form is open, storage failures
//! are logged and swallowed and download failures become an error status.

pub mod config;
pub mod controller;
pub mod logging;
pub mod shell;

use std::time::{SystemTime, UNIX_EPOCH};

use build_info_download::DownloadError;
use build_info_storage::{JsonFileStore, StorageError};
use thiserror::Error;

pub use config::AppConfig;
pub use controller::{CLEARED_MESSAGE, ERROR_MESSAGE, FormController, SUCCESS_MESSAGE};

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("BUILD_INFO_VERSION");

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Wall-clock milliseconds since the Unix epoch, used to drive status
/// timers.
pub fn unix_timestamp_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// Storage file opened for one session.
pub struct SessionStorage {
    /// Store backing the draft.
    pub store: JsonFileStore,
    /// `true` when the storage file did not exist yet.
    pub first_run: bool,
}

/// Creates the data directory if needed and opens the storage file.
///
/// First run is decided by the storage file alone, so an existing but empty
/// data directory still counts as a fresh install.
///
/// # Errors
/// Returns [`AppError::Io`] when the data directory cannot be created.
pub fn open_storage(config: &AppConfig) -> Result<SessionStorage, AppError> {
    std::fs::create_dir_all(&config.data_dir)?;
    let store = JsonFileStore::new(config.storage_path());
    let first_run = !store.exists();
    tracing::debug!(
        stage = "startup",
        action = "storage_opened",
        path = %store.path().display(),
        first_run,
        "storage file resolved"
    );
    Ok(SessionStorage { store, first_run })
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be resolved.
    #[error("config error: {0}")]
    Config(String),
    /// Storage subsystem error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    /// Download subsystem error.
    #[error("download error: {0}")]
    Download(#[from] DownloadError),
    /// Logging could not be initialized.
    #[error("logging error: {0}")]
    Logging(String),
    /// Terminal or filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
