#![warn(missing_docs)]
//! # build-info-download
//!
//! ## Purpose
//! Turns rendered announcement text into a downloaded file.
//!
//! ## Responsibilities
//! - Define the backend-agnostic [`DownloadBackend`] trait.
//! - Write downloads into a directory with browser-style name conflict
//!   handling ([`FsDownloadBackend`]).
//! - Keep downloads in memory for tests ([`MemoryDownloadBackend`]).
//! - Notify [`DownloadListener`]s when a download is created.
//!
//! ## Data flow
//! Form controller builds a [`DownloadRequest`] -> backend persists it and
//! yields a [`DownloadItem`] -> registered listeners observe the item.
//!
//! ## Ownership and lifetimes
//! Requests and items own their strings; listeners are shared `Arc`s and only
//! ever see borrowed items.
//!
//! ## Error model
//! Invalid filenames, unsupported options and IO failures are reported as
//! [`DownloadError`] values. There is no retry.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use url::Url;

/// MIME type of every download produced by the form.
pub const TEXT_PLAIN: &str = "text/plain";

/// Upper bound on ` (n)` suffixes tried before giving up on a filename.
pub const MAX_CONFLICT_SUFFIX: u32 = 999;

/// One requested download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Suggested file name, relative to the download directory.
    pub filename: String,
    /// File contents.
    pub content: String,
    /// MIME type of `content`.
    pub mime_type: String,
    /// Whether to prompt for a destination instead of saving directly.
    pub save_as: bool,
}

impl DownloadRequest {
    /// Creates a plain-text download saved without prompting.
    pub fn text(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            mime_type: TEXT_PLAIN.to_string(),
            save_as: false,
        }
    }
}

/// A download that was created by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadItem {
    /// Backend-assigned id, increasing from 1.
    pub id: u64,
    /// Final file name after conflict resolution.
    pub filename: String,
    /// Location of the downloaded file.
    pub url: Url,
    /// MIME type of the download.
    pub mime_type: String,
    /// Number of bytes written.
    pub total_bytes: u64,
}

/// Observer of download creation events.
pub trait DownloadListener: Send + Sync {
    /// Called once per created download.
    fn on_created(&self, item: &DownloadItem);
}

/// Trait implemented by concrete download providers.
pub trait DownloadBackend: Send + Sync {
    /// Creates one download.
    ///
    /// # Errors
    /// Returns [`DownloadError`] when the request is invalid or the download
    /// cannot be written.
    fn download(&self, request: &DownloadRequest) -> Result<DownloadItem, DownloadError>;
}

/// Listener registry shared by backends.
#[derive(Default)]
struct Listeners {
    entries: Mutex<Vec<Arc<dyn DownloadListener>>>,
}

impl Listeners {
    fn add(&self, listener: Arc<dyn DownloadListener>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(listener);
        }
    }

    fn notify(&self, item: &DownloadItem) {
        let snapshot = match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(_) => return,
        };
        for listener in snapshot {
            listener.on_created(item);
        }
    }
}

/// Writes downloads as files in one directory.
///
/// # Notes
/// An existing file is never overwritten: `name.txt` becomes `name (1).txt`,
/// `name (2).txt` and so on.
pub struct FsDownloadBackend {
    dir: PathBuf,
    next_id: AtomicU64,
    listeners: Listeners,
}

impl FsDownloadBackend {
    /// Creates a backend writing into `dir`. The directory is created on the
    /// first download.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            next_id: AtomicU64::new(1),
            listeners: Listeners::default(),
        }
    }

    /// Returns the download directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Registers a creation listener.
    pub fn add_listener(&self, listener: Arc<dyn DownloadListener>) {
        self.listeners.add(listener);
    }
}

impl DownloadBackend for FsDownloadBackend {
    fn download(&self, request: &DownloadRequest) -> Result<DownloadItem, DownloadError> {
        validate_filename(&request.filename)?;
        if request.save_as {
            return Err(DownloadError::SaveAsUnsupported);
        }

        std::fs::create_dir_all(&self.dir)?;
        let (path, mut file) = create_unique(&self.dir, &request.filename)?;
        file.write_all(request.content.as_bytes())?;
        file.flush()?;

        let absolute = std::path::absolute(&path)?;
        let url = Url::from_file_path(&absolute).map_err(|_| {
            DownloadError::Backend(format!(
                "cannot express '{}' as a file url",
                absolute.display()
            ))
        })?;

        let item = DownloadItem {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            filename: file_name_of(&path),
            url,
            mime_type: request.mime_type.clone(),
            total_bytes: request.content.len() as u64,
        };

        tracing::info!(
            stage = "download",
            action = "created",
            id = item.id,
            filename = %item.filename,
            bytes = item.total_bytes,
            "download written"
        );
        self.listeners.notify(&item);
        Ok(item)
    }
}

/// In-memory backend recording every request, for tests and dry runs.
#[derive(Default)]
pub struct MemoryDownloadBackend {
    downloads: Mutex<Vec<DownloadRequest>>,
    listeners: Listeners,
}

impl MemoryDownloadBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a creation listener.
    pub fn add_listener(&self, listener: Arc<dyn DownloadListener>) {
        self.listeners.add(listener);
    }

    /// Returns recorded requests in creation order.
    pub fn downloads(&self) -> Vec<DownloadRequest> {
        self.downloads
            .lock()
            .map(|downloads| downloads.clone())
            .unwrap_or_default()
    }
}

impl DownloadBackend for MemoryDownloadBackend {
    fn download(&self, request: &DownloadRequest) -> Result<DownloadItem, DownloadError> {
        validate_filename(&request.filename)?;

        let mut downloads = self
            .downloads
            .lock()
            .map_err(|_| DownloadError::Backend("download log lock poisoned".to_string()))?;
        downloads.push(request.clone());
        let id = downloads.len() as u64;
        drop(downloads);

        let mut url = Url::parse("memory:///")
            .map_err(|error| DownloadError::Backend(format!("invalid memory url: {error}")))?;
        url.path_segments_mut()
            .map_err(|_| DownloadError::Backend("memory url cannot hold a path".to_string()))?
            .clear()
            .push(&id.to_string())
            .push(&request.filename);
        let item = DownloadItem {
            id,
            filename: request.filename.clone(),
            url,
            mime_type: request.mime_type.clone(),
            total_bytes: request.content.len() as u64,
        };
        self.listeners.notify(&item);
        Ok(item)
    }
}

/// Validates a download filename.
///
/// # Errors
/// Returns [`DownloadError::InvalidFilename`] for blank names, path
/// separators, NUL bytes, or the `.`/`..` pseudo-entries.
pub fn validate_filename(filename: &str) -> Result<(), DownloadError> {
    let reason = if filename.trim().is_empty() {
        Some("filename is empty")
    } else if filename.contains(['/', '\\']) {
        Some("filename must not contain path separators")
    } else if filename.contains('\0') {
        Some("filename must not contain NUL")
    } else if filename == "." || filename == ".." {
        Some("filename must name a file")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(DownloadError::InvalidFilename {
            filename: filename.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

/// Returns the `index`-th conflict-free candidate for `filename`.
///
/// Index 0 is the name itself; later indices insert ` (n)` before the
/// extension.
pub fn conflict_candidate(filename: &str, index: u32) -> String {
    if index == 0 {
        return filename.to_string();
    }

    match filename.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => format!("{stem} ({index}).{extension}"),
        _ => format!("{filename} ({index})"),
    }
}

fn create_unique(dir: &Path, filename: &str) -> Result<(PathBuf, std::fs::File), DownloadError> {
    for index in 0..=MAX_CONFLICT_SUFFIX {
        let path = dir.join(conflict_candidate(filename, index));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(error) if error.kind() == ErrorKind::AlreadyExists => continue,
            Err(error) => return Err(DownloadError::Io(error)),
        }
    }

    Err(DownloadError::Backend(format!(
        "no free name for '{filename}' after {MAX_CONFLICT_SUFFIX} attempts"
    )))
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Download layer error type.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Filename rejected before writing.
    #[error("invalid download filename '{filename}': {reason}")]
    InvalidFilename {
        /// Rejected filename.
        filename: String,
        /// Rejection reason.
        reason: String,
    },
    /// Backend cannot prompt for a destination.
    #[error("save-as prompts are not supported by this backend")]
    SaveAsUnsupported,
    /// Filesystem failure.
    #[error("download io failure: {0}")]
    Io(#[from] std::io::Error),
    /// Backend runtime failure.
    #[error("download backend failure: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    //! Unit tests for filename policy.

    use super::*;

    #[test]
    fn conflict_candidates_insert_suffix_before_extension() {
        assert_eq!(conflict_candidate("acme-sf1.txt", 0), "acme-sf1.txt");
        assert_eq!(conflict_candidate("acme-sf1.txt", 2), "acme-sf1 (2).txt");
        assert_eq!(conflict_candidate("README", 1), "README (1)");
        assert_eq!(conflict_candidate(".hidden", 1), ".hidden (1)");
    }

    #[test]
    fn rejects_path_like_filenames() {
        assert!(validate_filename("-.txt").is_ok());
        assert!(validate_filename("").is_err());
        assert!(validate_filename("../escape.txt").is_err());
        assert!(validate_filename("a\\b.txt").is_err());
        assert!(validate_filename("..").is_err());
    }
}
