//! Runtime configuration resolved from environment variables.

use std::path::PathBuf;

use build_info_ui::STATUS_DISPLAY_MS;

use crate::AppError;

/// Overrides the directory holding the storage file.
pub const ENV_DATA_DIR: &str = "BUILD_INFO_DATA_DIR";
/// Overrides the download directory.
pub const ENV_DOWNLOAD_DIR: &str = "BUILD_INFO_DOWNLOAD_DIR";
/// Overrides the status display duration in milliseconds.
pub const ENV_STATUS_MS: &str = "BUILD_INFO_STATUS_MS";

/// File name of the local storage area inside the data directory.
pub const STORAGE_FILE_NAME: &str = "local-storage.json";

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding [`STORAGE_FILE_NAME`].
    pub data_dir: PathBuf,
    /// Directory receiving downloads.
    pub download_dir: PathBuf,
    /// How long status messages stay visible.
    pub status_display_ms: u64,
}

impl AppConfig {
    /// Resolves configuration from the process environment.
    ///
    /// # Errors
    /// Returns [`AppError::Config`] when no data directory can be determined.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`.
    ///
    /// Semantics:
    /// - Blank variables count as unset.
    /// - Data dir falls back to `<local data dir>/build-info`.
    /// - Download dir falls back to the user download dir, then the current
    ///   directory.
    /// - A status duration that is not a positive integer falls back to
    ///   [`STATUS_DISPLAY_MS`].
    ///
    /// # Errors
    /// Returns [`AppError::Config`] when no data directory can be determined.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let data_dir = match non_blank(ENV_DATA_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_local_dir()
                .map(|dir| dir.join("build-info"))
                .ok_or_else(|| {
                    AppError::Config(format!(
                        "cannot resolve a local data directory; set {ENV_DATA_DIR}"
                    ))
                })?,
        };

        let download_dir = match non_blank(ENV_DOWNLOAD_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => match dirs::download_dir() {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            },
        };

        let status_display_ms = non_blank(ENV_STATUS_MS)
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(STATUS_DISPLAY_MS);

        Ok(Self {
            data_dir,
            download_dir,
            status_display_ms,
        })
    }

    /// Path of the storage file.
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(STORAGE_FILE_NAME)
    }
}
