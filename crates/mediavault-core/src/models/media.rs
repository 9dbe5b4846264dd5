use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::StorageProvider;

/// Server-assigned record for one uploaded file, returned per item in the
/// upload response `data` array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileRecord {
    pub id: i64,
    pub name: String,
    pub file_type: String,
    /// Opaque index handle assigned by the storage backend.
    pub vault_index_id: String,
    #[serde(default)]
    pub data_set_id: Option<i64>,
    #[serde(default)]
    pub storage_id: Option<i64>,
    #[serde(default)]
    pub storage_info: Option<StorageProvider>,
    pub uploaded_at: DateTime<Utc>,
}

/// Row of GET /media/list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileListItem {
    pub id: i64,
    pub name: String,
    pub file_type: String,
    pub vault_index_id: String,
    pub uploaded_at: DateTime<Utc>,
}
