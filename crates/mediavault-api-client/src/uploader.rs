//! Per-file transfer primitive for the upload engine.
//!
//! Wraps the API client so the engine can stream items individually: each
//! transfer posts a single-item batch and returns the created record. The
//! batched path ([`ApiClient::upload_batch`]) remains the default wire
//! contract; this exists for upload surfaces driven by the engine.

use async_trait::async_trait;

use mediavault_core::models::{FileRecord, UploadBatch, UploadItem};
use mediavault_core::VaultError;
use mediavault_upload::Uploader;

use crate::ApiClient;

pub struct ClientUploader {
    client: ApiClient,
    provider_id: i64,
    category_id: Option<String>,
}

impl ClientUploader {
    pub fn new(client: ApiClient, provider_id: i64, category_id: Option<String>) -> Self {
        Self {
            client,
            provider_id,
            category_id,
        }
    }
}

#[async_trait]
impl Uploader for ClientUploader {
    async fn transfer(&self, item: &UploadItem) -> Result<FileRecord, VaultError> {
        let mut batch = UploadBatch::new(self.provider_id, vec![item.clone()]);
        if let Some(category) = &self.category_id {
            batch = batch.with_category(category.clone());
        }
        let records = self.client.upload_batch(batch).await?;
        records.into_iter().next().ok_or_else(|| VaultError::Server {
            status_code: 200,
            message: "Upload response contained no record".to_string(),
        })
    }
}
