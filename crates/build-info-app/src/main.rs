#![warn(missing_docs)]
//! # build-info binary
//!
//! Opens the build form on the terminal.

use std::sync::Arc;

use build_info_app::{
    AppConfig, AppError, FormController, app_version, logging, open_storage, shell,
};
use build_info_download::FsDownloadBackend;
use build_info_observer::LifecycleObserver;
use build_info_storage::DraftStore;

/// CLI entry point.
fn main() {
    if let Err(error) = run() {
        eprintln!("build-info failed: {error}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    logging::init()?;
    let config = AppConfig::from_env()?;
    tracing::info!(
        stage = "startup",
        action = "config_resolved",
        version = app_version(),
        data_dir = %config.data_dir.display(),
        download_dir = %config.download_dir.display(),
        "build-info starting"
    );

    let storage = open_storage(&config)?;

    let observer = Arc::new(LifecycleObserver::new());
    if storage.first_run {
        observer.on_installed();
    }

    let downloads = Arc::new(FsDownloadBackend::new(&config.download_dir));
    downloads.add_listener(observer);
    tracing::debug!(
        stage = "startup",
        action = "downloads_ready",
        dir = %downloads.dir().display(),
        "download backend ready"
    );

    let drafts = DraftStore::new(Arc::new(storage.store));
    let mut controller = FormController::open(drafts, downloads, config.status_display_ms);

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    shell::run(
        &mut controller,
        stdin.lock(),
        &mut stdout,
        build_info_app::unix_timestamp_millis,
    )?;

    tracing::info!(stage = "shutdown", action = "closed", "form closed");
    Ok(())
}
