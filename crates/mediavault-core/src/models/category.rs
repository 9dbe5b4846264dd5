use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserRole;

/// Row of GET /category/list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub uid: Uuid,
    pub name: String,
    #[serde(default)]
    pub file_count: Option<u64>,
    pub created_at: DateTime<Utc>,
}

/// Row of GET /user/list. Admin-only view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultUser {
    pub id: i64,
    pub username: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}
