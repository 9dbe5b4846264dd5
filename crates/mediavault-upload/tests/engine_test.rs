//! Upload engine behavior tests with mock uploaders.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use mediavault_core::error::ErrorKind;
use mediavault_core::models::{FileRecord, FileSource, UploadItem, UploadOutcome};
use mediavault_core::VaultError;
use mediavault_upload::{EngineConfig, UploadEngine, UploadEvent, Uploader};

fn record(name: &str) -> FileRecord {
    FileRecord {
        id: 1,
        name: name.to_string(),
        file_type: "application/octet-stream".to_string(),
        vault_index_id: format!("vx-{}", name),
        data_set_id: None,
        storage_id: None,
        storage_info: None,
        uploaded_at: Utc::now(),
    }
}

fn item(name: &str) -> UploadItem {
    UploadItem::new(FileSource::new(name, vec![0u8; 8]), "", vec![])
}

fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<UploadEvent>) -> Vec<UploadEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Succeeds for every item except those whose file name contains "bad".
struct SelectiveUploader;

#[async_trait]
impl Uploader for SelectiveUploader {
    async fn transfer(&self, item: &UploadItem) -> Result<FileRecord, VaultError> {
        if item.file.file_name.contains("bad") {
            Err(VaultError::Server {
                status_code: 422,
                message: "rejected by backend".to_string(),
            })
        } else {
            Ok(record(&item.file.file_name))
        }
    }
}

/// Tracks the number of simultaneously in-flight transfers.
struct ConcurrencyProbe {
    current: AtomicUsize,
    max_seen: AtomicUsize,
}

impl ConcurrencyProbe {
    fn new() -> Self {
        Self {
            current: AtomicUsize::new(0),
            max_seen: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Uploader for ConcurrencyProbe {
    async fn transfer(&self, item: &UploadItem) -> Result<FileRecord, VaultError> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_seen.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(25)).await;
        self.current.fetch_sub(1, Ordering::SeqCst);
        Ok(record(&item.file.file_name))
    }
}

/// Never completes within any practical deadline.
struct StallingUploader;

#[async_trait]
impl Uploader for StallingUploader {
    async fn transfer(&self, item: &UploadItem) -> Result<FileRecord, VaultError> {
        if item.file.file_name.contains("slow") {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        Ok(record(&item.file.file_name))
    }
}

#[tokio::test]
async fn partial_failure_partitions_exactly() {
    let engine = UploadEngine::new(Arc::new(SelectiveUploader), EngineConfig::default());
    let ok = engine.register(item("good.png"));
    let bad = engine.register(item("bad.png"));

    let report = engine.submit(None).await;

    assert_eq!(report.successful.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.successful[0].handle, ok);
    assert_eq!(report.successful[0].ordinal, 0);
    assert_eq!(report.failed[0].handle, bad);
    assert_eq!(report.failed[0].ordinal, 1);
    assert_eq!(report.failed[0].kind, ErrorKind::Server);
    assert!(report.failed[0].detail.contains("rejected by backend"));
    assert_eq!(report.total(), 2);

    // Engine state reflects the terminals; acknowledging frees the slots.
    assert!(matches!(
        engine.outcome(ok),
        Some(UploadOutcome::Succeeded(_))
    ));
    assert!(engine.acknowledge(bad));
    assert_eq!(engine.len(), 1);
}

#[tokio::test]
async fn empty_submission_completes_without_start() {
    let engine = UploadEngine::new(Arc::new(SelectiveUploader), EngineConfig::default());
    let mut rx = engine.take_events().unwrap();

    let report = engine.submit(None).await;
    assert!(report.is_empty());

    let events = drain(&mut rx);
    assert_eq!(events.len(), 1);
    match &events[0] {
        UploadEvent::Completed(completed) => {
            assert!(completed.successful.is_empty());
            assert!(completed.failed.is_empty());
        }
        other => panic!("expected Completed, got {:?}", other),
    }
}

#[tokio::test]
async fn start_fires_once_and_complete_fires_last() {
    let engine = UploadEngine::new(Arc::new(SelectiveUploader), EngineConfig::default());
    let mut rx = engine.take_events().unwrap();
    engine.register(item("a.png"));
    engine.register(item("bad.png"));
    engine.register(item("c.png"));

    engine.submit(Some(2)).await;
    let events = drain(&mut rx);

    let starts = events
        .iter()
        .filter(|e| matches!(e, UploadEvent::Started))
        .count();
    assert_eq!(starts, 1);

    let terminal_events = events
        .iter()
        .filter(|e| matches!(e, UploadEvent::ItemSucceeded(_) | UploadEvent::ItemFailed(_)))
        .count();
    assert_eq!(terminal_events, 3);

    // Completed is strictly after every per-item terminal event.
    match events.last() {
        Some(UploadEvent::Completed(report)) => assert_eq!(report.total(), 3),
        other => panic!("expected trailing Completed, got {:?}", other),
    }
}

#[tokio::test]
async fn concurrency_stays_within_limit() {
    let probe = Arc::new(ConcurrencyProbe::new());
    let engine = UploadEngine::new(Arc::clone(&probe), EngineConfig::default());
    for i in 0..5 {
        engine.register(item(&format!("f{}.png", i)));
    }

    let report = engine.submit(Some(2)).await;

    assert_eq!(report.successful.len(), 5);
    assert!(probe.max_seen.load(Ordering::SeqCst) <= 2);
}

#[tokio::test]
async fn timeout_fails_one_item_without_aborting_siblings() {
    let config = EngineConfig {
        transfer_timeout: Duration::from_millis(50),
        ..EngineConfig::default()
    };
    let engine = UploadEngine::new(Arc::new(StallingUploader), config);
    let slow = engine.register(item("slow.png"));
    let fast = engine.register(item("fast.png"));

    let report = engine.submit(None).await;

    assert_eq!(report.successful.len(), 1);
    assert_eq!(report.successful[0].handle, fast);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].handle, slow);
    assert_eq!(report.failed[0].kind, ErrorKind::Timeout);
}

#[tokio::test]
async fn second_submission_drains_only_new_items() {
    let engine = UploadEngine::new(Arc::new(SelectiveUploader), EngineConfig::default());
    engine.register(item("a.png"));
    let first = engine.submit(None).await;
    assert_eq!(first.total(), 1);

    engine.register(item("b.png"));
    engine.register(item("c.png"));
    let second = engine.submit(None).await;

    assert_eq!(second.total(), 2);
    // Ordinals restart per submission, contiguous from zero.
    let ordinals: Vec<usize> = second.successful.iter().map(|s| s.ordinal).collect();
    assert_eq!(ordinals, vec![0, 1]);
}
