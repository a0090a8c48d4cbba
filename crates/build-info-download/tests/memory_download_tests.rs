//! Integration tests for the in-memory download backend.

use build_info_download::{DownloadBackend, DownloadRequest, MemoryDownloadBackend, TEXT_PLAIN};

#[test]
fn memory_download_tests_records_requests_in_order() {
    let backend = MemoryDownloadBackend::new();
    let first = backend
        .download(&DownloadRequest::text("a-1.txt", "first"))
        .expect("download should succeed");
    let second = backend
        .download(&DownloadRequest::text("a-1.txt", "second"))
        .expect("download should succeed");

    assert_eq!((first.id, second.id), (1, 2));
    assert_eq!(first.mime_type, TEXT_PLAIN);
    assert_eq!(second.url.as_str(), "memory:///2/a-1.txt");

    let recorded = backend.downloads();
    assert_eq!(recorded.len(), 2);
    assert_eq!(recorded[1].content, "second");
}
