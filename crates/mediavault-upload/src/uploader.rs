//! Uploader trait: the transfer primitive used by the engine.
//!
//! The API client implements this over reqwest multipart; tests implement it
//! with in-memory mocks. Submit a file, eventually get success or failure.

use async_trait::async_trait;

use mediavault_core::models::{FileRecord, UploadItem};
use mediavault_core::VaultError;

/// A black-box transfer primitive: moves one item to the backend and returns
/// the server-assigned record.
#[async_trait]
pub trait Uploader: Send + Sync + 'static {
    async fn transfer(&self, item: &UploadItem) -> Result<FileRecord, VaultError>;
}
