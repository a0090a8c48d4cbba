//! Shared fixtures for app integration tests.

use std::sync::Arc;

use build_info_app::FormController;
use build_info_download::{
    DownloadBackend, DownloadError, DownloadItem, DownloadRequest, MemoryDownloadBackend,
};
use build_info_storage::{DraftStore, KeyValueStore, MemoryStore, StorageError};
use serde_json::Value;

/// Status duration used by fixtures.
#[allow(dead_code)]
pub const TEST_STATUS_MS: u64 = 3_000;

/// Controller wired to in-memory storage and downloads.
#[allow(dead_code)]
pub struct Harness {
    pub controller: FormController,
    pub store: Arc<MemoryStore>,
    pub downloads: Arc<MemoryDownloadBackend>,
}

/// Opens a controller over fresh in-memory backends.
#[allow(dead_code)]
pub fn harness() -> Harness {
    harness_with_store(Arc::new(MemoryStore::new()))
}

/// Opens a controller over `store`, restoring whatever draft it holds.
#[allow(dead_code)]
pub fn harness_with_store(store: Arc<MemoryStore>) -> Harness {
    let downloads = Arc::new(MemoryDownloadBackend::new());
    let controller = FormController::open(
        DraftStore::new(store.clone()),
        downloads.clone(),
        TEST_STATUS_MS,
    );
    Harness {
        controller,
        store,
        downloads,
    }
}

/// Storage area whose every operation fails.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn read(&self, _key: &str) -> Result<Option<Value>, StorageError> {
        Err(StorageError::Backend("storage offline".to_string()))
    }

    fn write(&self, _key: &str, _value: Value) -> Result<(), StorageError> {
        Err(StorageError::Backend("storage offline".to_string()))
    }

    fn delete(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Backend("storage offline".to_string()))
    }
}

/// Download backend whose every request fails.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct BrokenDownloads;

impl DownloadBackend for BrokenDownloads {
    fn download(&self, _request: &DownloadRequest) -> Result<DownloadItem, DownloadError> {
        Err(DownloadError::Backend("download api unavailable".to_string()))
    }
}
