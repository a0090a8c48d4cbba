#![warn(missing_docs)]
//! # build-info-observer
//!
//! Passive lifecycle listener: logs when the tool is installed and when a
//! build-info download starts. It keeps no state and never talks to the form
//! controller.

use build_info_download::{DownloadItem, DownloadListener};

/// Filename marker identifying build-info downloads.
pub const DOWNLOAD_MARKER: &str = "BuildInfo_";

/// Stateless install/download observer.
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecycleObserver;

impl LifecycleObserver {
    /// Creates the observer.
    pub fn new() -> Self {
        Self
    }

    /// Logs the first-run install event.
    pub fn on_installed(&self) {
        tracing::info!(
            stage = "lifecycle",
            action = "installed",
            "Build Information Generator installed"
        );
    }

    /// Logs a download whose filename carries [`DOWNLOAD_MARKER`].
    ///
    /// Returns `true` when the download matched and was logged.
    pub fn on_download_created(&self, item: &DownloadItem) -> bool {
        if !is_build_info_download(&item.filename) {
            return false;
        }

        tracing::info!(
            stage = "lifecycle",
            action = "download_started",
            id = item.id,
            filename = %item.filename,
            "Build info file download started"
        );
        true
    }
}

impl DownloadListener for LifecycleObserver {
    fn on_created(&self, item: &DownloadItem) {
        self.on_download_created(item);
    }
}

/// Returns `true` when `filename` contains [`DOWNLOAD_MARKER`].
pub fn is_build_info_download(filename: &str) -> bool {
    filename.contains(DOWNLOAD_MARKER)
}
