//! Upload engine: registration queue, bounded-concurrency submission, and
//! lifecycle events.
//!
//! Cancellation: dropping the engine (or the future returned by
//! [`UploadEngine::submit`]) stops dispatching queued items and aborts
//! transfers that have not completed, but a transfer whose request bytes are
//! already on the wire may still reach the backend. Treat teardown as
//! best-effort cancellation, not a guarantee. Once the event receiver is
//! dropped, further events are discarded silently.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

use mediavault_core::constants::{DEFAULT_CONCURRENT_UPLOADS, UPLOAD_TIMEOUT_SECS};
use mediavault_core::error::ErrorKind;
use mediavault_core::models::{
    BatchReport, ItemFailure, ItemHandle, ItemSuccess, UploadItem, UploadOutcome,
};

use crate::uploader::Uploader;

/// Lifecycle events emitted by the engine. Per submission, `Started` fires at
/// most once (never for an empty submission) and `Completed` fires exactly
/// once, strictly after every per-item terminal event.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    Started,
    ItemSucceeded(ItemSuccess),
    ItemFailed(ItemFailure),
    Completed(BatchReport),
}

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Maximum concurrent in-flight transfers per submission.
    pub concurrency_limit: usize,
    /// Deadline for one transfer. Exceeding it fails that item only.
    pub transfer_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: DEFAULT_CONCURRENT_UPLOADS,
            transfer_timeout: Duration::from_secs(UPLOAD_TIMEOUT_SECS),
        }
    }
}

struct Registered {
    handle: ItemHandle,
    item: Arc<UploadItem>,
    outcome: UploadOutcome,
}

#[derive(Default)]
struct EngineState {
    next_id: u64,
    items: Vec<Registered>,
    /// Handles drained into a submission; excluded from later submits and
    /// from [`UploadEngine::remove`].
    submitted: HashSet<ItemHandle>,
}

struct Shared<U> {
    uploader: Arc<U>,
    config: EngineConfig,
    state: Mutex<EngineState>,
    events_tx: mpsc::UnboundedSender<UploadEvent>,
}

impl<U> Shared<U> {
    fn set_outcome(&self, handle: ItemHandle, outcome: UploadOutcome) {
        let mut state = self.state.lock().expect("engine state lock poisoned");
        if let Some(registered) = state.items.iter_mut().find(|r| r.handle == handle) {
            registered.outcome = outcome;
        }
    }
}

/// Manages submission of registered files to the backend.
///
/// One engine instance owns its queue; access is cooperative and
/// single-surface. Registering and removing items updates the live count
/// synchronously. Submitting a second batch while a prior one is still in
/// flight is permitted; each submission drains the items pending at that
/// moment.
pub struct UploadEngine<U> {
    shared: Arc<Shared<U>>,
    events_rx: Mutex<Option<mpsc::UnboundedReceiver<UploadEvent>>>,
}

impl<U: Uploader> UploadEngine<U> {
    pub fn new(uploader: Arc<U>, config: EngineConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            shared: Arc::new(Shared {
                uploader,
                config,
                state: Mutex::new(EngineState::default()),
                events_tx,
            }),
            events_rx: Mutex::new(Some(events_rx)),
        }
    }

    /// Take the event receiver. Returns `None` after the first call.
    pub fn take_events(&self) -> Option<mpsc::UnboundedReceiver<UploadEvent>> {
        self.events_rx
            .lock()
            .expect("event receiver lock poisoned")
            .take()
    }

    /// Add a pending item. No network activity is assigned yet.
    pub fn register(&self, item: UploadItem) -> ItemHandle {
        let mut state = self.shared.state.lock().expect("engine state lock poisoned");
        state.next_id += 1;
        let handle = ItemHandle(state.next_id);
        state.items.push(Registered {
            handle,
            item: Arc::new(item),
            outcome: UploadOutcome::Pending,
        });
        tracing::debug!(item = %handle, "Item registered");
        handle
    }

    /// Remove a pending item from the selection. Items already drained into a
    /// submission cannot be removed. Returns whether anything was removed.
    pub fn remove(&self, handle: ItemHandle) -> bool {
        let mut state = self.shared.state.lock().expect("engine state lock poisoned");
        if state.submitted.contains(&handle) {
            return false;
        }
        let before = state.items.len();
        state
            .items
            .retain(|r| !(r.handle == handle && r.outcome == UploadOutcome::Pending));
        state.items.len() < before
    }

    /// Remove an item that has reached a terminal state.
    pub fn acknowledge(&self, handle: ItemHandle) -> bool {
        let mut state = self.shared.state.lock().expect("engine state lock poisoned");
        let before = state.items.len();
        state
            .items
            .retain(|r| !(r.handle == handle && r.outcome.is_terminal()));
        let removed = state.items.len() < before;
        if removed {
            state.submitted.remove(&handle);
        }
        removed
    }

    /// Live count of registered items (not yet terminal-and-removed).
    pub fn len(&self) -> usize {
        self.shared
            .state
            .lock()
            .expect("engine state lock poisoned")
            .items
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current lifecycle state of one item.
    pub fn outcome(&self, handle: ItemHandle) -> Option<UploadOutcome> {
        self.shared
            .state
            .lock()
            .expect("engine state lock poisoned")
            .items
            .iter()
            .find(|r| r.handle == handle)
            .map(|r| r.outcome.clone())
    }

    /// Transfer all currently pending items, at most `limit` in flight
    /// (engine default when `None`). Items wait FIFO by registration order;
    /// completion order is not guaranteed. Returns the terminal partition,
    /// which is also emitted as [`UploadEvent::Completed`].
    pub async fn submit(&self, limit: Option<usize>) -> BatchReport {
        let limit = limit
            .unwrap_or(self.shared.config.concurrency_limit)
            .max(1);

        // Ordinals are fixed here, 0..N-1 contiguously in registration order.
        let submission: Vec<(ItemHandle, usize, Arc<UploadItem>)> = {
            let mut state = self.shared.state.lock().expect("engine state lock poisoned");
            let pending: Vec<(ItemHandle, Arc<UploadItem>)> = state
                .items
                .iter()
                .filter(|r| {
                    r.outcome == UploadOutcome::Pending && !state.submitted.contains(&r.handle)
                })
                .map(|r| (r.handle, Arc::clone(&r.item)))
                .collect();
            for (handle, _) in &pending {
                state.submitted.insert(*handle);
            }
            pending
                .into_iter()
                .enumerate()
                .map(|(ordinal, (handle, item))| (handle, ordinal, item))
                .collect()
        };

        if submission.is_empty() {
            let report = BatchReport::default();
            let _ = self
                .shared
                .events_tx
                .send(UploadEvent::Completed(report.clone()));
            return report;
        }

        tracing::info!(
            items = submission.len(),
            limit,
            "Upload submission started"
        );

        let semaphore = Arc::new(Semaphore::new(limit));
        let started = Arc::new(AtomicBool::new(false));
        let mut remaining: HashMap<ItemHandle, usize> = submission
            .iter()
            .map(|(handle, ordinal, _)| (*handle, *ordinal))
            .collect();

        let mut join_set: JoinSet<Result<ItemSuccess, ItemFailure>> = JoinSet::new();
        for (handle, ordinal, item) in submission {
            let shared = Arc::clone(&self.shared);
            let semaphore = Arc::clone(&semaphore);
            let started = Arc::clone(&started);
            join_set.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("submission semaphore closed");

                if !started.swap(true, Ordering::SeqCst) {
                    let _ = shared.events_tx.send(UploadEvent::Started);
                }
                shared.set_outcome(handle, UploadOutcome::InFlight);
                tracing::debug!(item = %handle, ordinal, "Transfer started");

                let result = tokio::time::timeout(
                    shared.config.transfer_timeout,
                    shared.uploader.transfer(&item),
                )
                .await;

                match result {
                    Ok(Ok(record)) => {
                        shared.set_outcome(handle, UploadOutcome::Succeeded(record.clone()));
                        tracing::info!(item = %handle, record_id = record.id, "Transfer succeeded");
                        let success = ItemSuccess {
                            handle,
                            ordinal,
                            record,
                        };
                        let _ = shared
                            .events_tx
                            .send(UploadEvent::ItemSucceeded(success.clone()));
                        Ok(success)
                    }
                    Ok(Err(e)) => {
                        let kind = e.kind();
                        let detail = e.to_string();
                        shared.set_outcome(
                            handle,
                            UploadOutcome::Failed {
                                kind,
                                detail: detail.clone(),
                            },
                        );
                        tracing::error!(item = %handle, error = %detail, "Transfer failed");
                        let failure = ItemFailure {
                            handle,
                            ordinal,
                            kind,
                            detail,
                        };
                        let _ = shared
                            .events_tx
                            .send(UploadEvent::ItemFailed(failure.clone()));
                        Err(failure)
                    }
                    Err(_) => {
                        let detail = format!(
                            "transfer exceeded {}s deadline",
                            shared.config.transfer_timeout.as_secs()
                        );
                        shared.set_outcome(
                            handle,
                            UploadOutcome::Failed {
                                kind: ErrorKind::Timeout,
                                detail: detail.clone(),
                            },
                        );
                        tracing::error!(item = %handle, "Transfer timed out");
                        let failure = ItemFailure {
                            handle,
                            ordinal,
                            kind: ErrorKind::Timeout,
                            detail,
                        };
                        let _ = shared
                            .events_tx
                            .send(UploadEvent::ItemFailed(failure.clone()));
                        Err(failure)
                    }
                }
            });
        }

        let mut report = BatchReport::default();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(Ok(success)) => {
                    remaining.remove(&success.handle);
                    report.successful.push(success);
                }
                Ok(Err(failure)) => {
                    remaining.remove(&failure.handle);
                    report.failed.push(failure);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Transfer task did not report a result");
                }
            }
        }

        // A task that died without reporting still gets a terminal failure so
        // the partition stays exhaustive over the submission.
        for (handle, ordinal) in remaining {
            let detail = "transfer task failed before reporting".to_string();
            self.shared.set_outcome(
                handle,
                UploadOutcome::Failed {
                    kind: ErrorKind::Internal,
                    detail: detail.clone(),
                },
            );
            let failure = ItemFailure {
                handle,
                ordinal,
                kind: ErrorKind::Internal,
                detail,
            };
            let _ = self
                .shared
                .events_tx
                .send(UploadEvent::ItemFailed(failure.clone()));
            report.failed.push(failure);
        }

        report.successful.sort_by_key(|s| s.ordinal);
        report.failed.sort_by_key(|f| f.ordinal);

        tracing::info!(
            successful = report.successful.len(),
            failed = report.failed.len(),
            "Upload submission completed"
        );
        let _ = self
            .shared
            .events_tx
            .send(UploadEvent::Completed(report.clone()));
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mediavault_core::models::{FileRecord, FileSource};
    use mediavault_core::VaultError;

    struct RejectAll;

    #[async_trait]
    impl Uploader for RejectAll {
        async fn transfer(&self, _item: &UploadItem) -> Result<FileRecord, VaultError> {
            Err(VaultError::Network("unreachable".to_string()))
        }
    }

    fn item(name: &str) -> UploadItem {
        UploadItem::new(FileSource::new(name, vec![0u8; 4]), "", vec![])
    }

    #[test]
    fn register_and_remove_update_count_synchronously() {
        let engine = UploadEngine::new(Arc::new(RejectAll), EngineConfig::default());
        assert!(engine.is_empty());

        let a = engine.register(item("a.png"));
        let b = engine.register(item("b.png"));
        assert_eq!(engine.len(), 2);

        assert!(engine.remove(a));
        assert_eq!(engine.len(), 1);
        // Removing twice is a no-op.
        assert!(!engine.remove(a));
        assert_eq!(engine.outcome(b), Some(UploadOutcome::Pending));
    }

    #[test]
    fn handles_are_unique_and_ordered() {
        let engine = UploadEngine::new(Arc::new(RejectAll), EngineConfig::default());
        let a = engine.register(item("a.png"));
        let b = engine.register(item("b.png"));
        assert!(b > a);
    }

    #[test]
    fn take_events_is_single_use() {
        let engine = UploadEngine::new(Arc::new(RejectAll), EngineConfig::default());
        assert!(engine.take_events().is_some());
        assert!(engine.take_events().is_none());
    }
}
