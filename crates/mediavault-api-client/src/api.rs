//! Domain methods for the mediavault API client.
//!
//! Thin typed wrappers over the transport helpers: each method unwraps the
//! backend envelope and surfaces `VaultError`. List endpoints are pure
//! request/response mapping at this boundary.

use mediavault_core::constants::{
    AUTH_LOGIN_PATH, CATEGORY_LIST_PATH, MEDIA_LIST_PATH, STATS_PATH, STORAGE_INFO_PATH,
    UPLOAD_PATH, USER_LIST_PATH,
};
use mediavault_core::models::{
    Category, DashboardStats, Envelope, FileListItem, FileRecord, ListEnvelope, LoginData,
    PageMeta, PageParams, StorageInfo, StorageProvider, UploadBatch, VaultUser,
};
use mediavault_core::VaultError;

use crate::{batch, ApiClient};

/// Unwrap a single-object envelope: `success` must be true and `data`
/// present, even when the transport status was 2xx.
fn unwrap_envelope<T>(envelope: Envelope<T>) -> Result<T, VaultError> {
    if !envelope.success {
        return Err(VaultError::Server {
            status_code: envelope.status_code.unwrap_or(200),
            message: envelope.message,
        });
    }
    envelope.data.ok_or_else(|| VaultError::Server {
        status_code: envelope.status_code.unwrap_or(200),
        message: "Response envelope is missing data".to_string(),
    })
}

fn unwrap_list_envelope<T>(
    envelope: ListEnvelope<T>,
) -> Result<(Vec<T>, Option<PageMeta>), VaultError> {
    if !envelope.success {
        return Err(VaultError::Server {
            status_code: 200,
            message: envelope.message,
        });
    }
    Ok((envelope.data, envelope.meta))
}

impl ApiClient {
    /// Log in against the admin auth endpoint. On success the session store
    /// is updated atomically and persisted; on rejection the backend's
    /// message is propagated unchanged.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginData, VaultError> {
        let body = serde_json::json!({
            "username": username.trim(),
            "password": password,
        });
        let result: Result<Envelope<LoginData>, VaultError> =
            self.post_json(AUTH_LOGIN_PATH, &body).await;
        let data = result
            .and_then(unwrap_envelope)
            .map_err(|e| match e {
                VaultError::Server { message, .. } | VaultError::SessionExpired(message) => {
                    VaultError::Auth(message)
                }
                other => other,
            })?;
        self.session().set_auth(data.token.clone(), data.user.clone());
        tracing::info!(user = %data.user.username, "Logged in");
        Ok(data)
    }

    /// Upload a batch of validated items as one multipart request.
    /// Admin-restricted; uses the upload-length deadline.
    pub async fn upload_batch(&self, batch: UploadBatch) -> Result<Vec<FileRecord>, VaultError> {
        let count = batch.items.len();
        let form = batch::encode(batch)?.into_form();
        let envelope: Envelope<Vec<FileRecord>> = self.post_multipart(UPLOAD_PATH, form).await?;
        if !envelope.success {
            return Err(VaultError::Server {
                status_code: envelope.status_code.unwrap_or(200),
                message: envelope.message,
            });
        }
        let records = envelope.data.unwrap_or_default();
        tracing::info!(submitted = count, created = records.len(), "Batch uploaded");
        Ok(records)
    }

    /// Storage providers available for upload. Inactive providers are
    /// filtered out; they are never selectable.
    pub async fn storage_providers(&self) -> Result<Vec<StorageProvider>, VaultError> {
        let envelope: Envelope<StorageInfo> = self.get(STORAGE_INFO_PATH, &[]).await?;
        let info = unwrap_envelope(envelope)?;
        Ok(info
            .providers
            .into_iter()
            .filter(|p| p.is_active)
            .collect())
    }

    /// Paginated file list. Unauthenticated endpoint.
    pub async fn list_files(
        &self,
        params: &PageParams,
    ) -> Result<(Vec<FileListItem>, Option<PageMeta>), VaultError> {
        let envelope: ListEnvelope<FileListItem> =
            self.get(MEDIA_LIST_PATH, &params.to_query()).await?;
        unwrap_list_envelope(envelope)
    }

    /// Paginated category list.
    pub async fn list_categories(
        &self,
        params: &PageParams,
    ) -> Result<(Vec<Category>, Option<PageMeta>), VaultError> {
        let envelope: ListEnvelope<Category> =
            self.get(CATEGORY_LIST_PATH, &params.to_query()).await?;
        unwrap_list_envelope(envelope)
    }

    /// Paginated user list. Admin-restricted.
    pub async fn list_users(
        &self,
        params: &PageParams,
    ) -> Result<(Vec<VaultUser>, Option<PageMeta>), VaultError> {
        let envelope: ListEnvelope<VaultUser> =
            self.get(USER_LIST_PATH, &params.to_query()).await?;
        unwrap_list_envelope(envelope)
    }

    /// Dashboard counters. Requires a session; `user_count` is present only
    /// for admins.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, VaultError> {
        let envelope: Envelope<DashboardStats> = self.get(STATS_PATH, &[]).await?;
        unwrap_envelope(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwrap_envelope_rejects_success_false_on_2xx() {
        let envelope: Envelope<u32> = Envelope {
            success: false,
            message: "quota exceeded".to_string(),
            data: None,
            status_code: Some(402),
        };
        match unwrap_envelope(envelope) {
            Err(VaultError::Server {
                status_code,
                message,
            }) => {
                assert_eq!(status_code, 402);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("expected Server error, got {:?}", other),
        }
    }

    #[test]
    fn unwrap_envelope_requires_data() {
        let envelope: Envelope<u32> = Envelope {
            success: true,
            message: "ok".to_string(),
            data: None,
            status_code: None,
        };
        assert!(unwrap_envelope(envelope).is_err());
    }

    #[test]
    fn unwrap_list_envelope_passes_meta_through() {
        let envelope = ListEnvelope {
            success: true,
            message: "ok".to_string(),
            data: vec![1u32, 2, 3],
            meta: Some(PageMeta {
                total: 3,
                page: 1,
                page_size: 10,
                total_pages: 1,
            }),
        };
        let (rows, meta) = unwrap_list_envelope(envelope).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(meta.unwrap().total, 3);
    }
}
