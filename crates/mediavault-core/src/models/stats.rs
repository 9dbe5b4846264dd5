use serde::{Deserialize, Serialize};

/// `data` payload of GET /stats: dashboard counters. `user_count` is only
/// present for admin sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub file_count: u64,
    pub category_count: u64,
    #[serde(default)]
    pub user_count: Option<u64>,
}
