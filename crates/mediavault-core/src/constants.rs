//! Shared constants for the admin client.

/// Durable key for the bearer token.
pub const STORAGE_KEY_TOKEN: &str = "app_token";

/// Durable key for the authenticated user object.
pub const STORAGE_KEY_USER: &str = "app_user";

/// Default timeout for read/list requests, in seconds.
pub const API_TIMEOUT_SECS: u64 = 30;

/// Timeout for upload requests, in seconds. Uploads include backend-side
/// durable-storage and settlement steps, so this is materially longer than
/// [`API_TIMEOUT_SECS`].
pub const UPLOAD_TIMEOUT_SECS: u64 = 300;

/// Default number of concurrent in-flight transfers for the upload engine.
pub const DEFAULT_CONCURRENT_UPLOADS: usize = 4;

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Login destination path.
pub const LOGIN_PATH: &str = "/login";

/// Landing path used when a login redirect has no saved destination.
pub const DEFAULT_LANDING_PATH: &str = "/";

/// Backend endpoint paths.
pub const AUTH_LOGIN_PATH: &str = "/auth/admin/login";
pub const UPLOAD_PATH: &str = "/media/upload";
pub const STORAGE_INFO_PATH: &str = "/media/storage-info";
pub const MEDIA_LIST_PATH: &str = "/media/list";
pub const CATEGORY_LIST_PATH: &str = "/category/list";
pub const USER_LIST_PATH: &str = "/user/list";
pub const STATS_PATH: &str = "/stats";
