//! Configuration module
//!
//! Env-driven configuration for the admin client: backend base URL, request
//! timeouts, and the upload concurrency bound.

use std::env;

use crate::constants::{API_TIMEOUT_SECS, DEFAULT_CONCURRENT_UPLOADS, UPLOAD_TIMEOUT_SECS};

/// Client configuration shared by the API client and upload engine.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash.
    pub base_url: String,
    /// Timeout in seconds for read/list requests.
    pub request_timeout_secs: u64,
    /// Timeout in seconds for upload requests.
    pub upload_timeout_secs: u64,
    /// Maximum concurrent in-flight transfers.
    pub max_concurrent_uploads: usize,
    /// Application base path, prepended to client-side routes.
    pub base_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            request_timeout_secs: API_TIMEOUT_SECS,
            upload_timeout_secs: UPLOAD_TIMEOUT_SECS,
            max_concurrent_uploads: DEFAULT_CONCURRENT_UPLOADS,
            base_path: String::new(),
        }
    }
}

impl ClientConfig {
    /// Build from environment: MEDIAVAULT_API_URL (or API_URL), with optional
    /// MEDIAVAULT_REQUEST_TIMEOUT_SECS, MEDIAVAULT_UPLOAD_TIMEOUT_SECS,
    /// MEDIAVAULT_MAX_CONCURRENT_UPLOADS, MEDIAVAULT_BASE_PATH overrides.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = env::var("MEDIAVAULT_API_URL")
            .or_else(|_| env::var("API_URL"))
            .unwrap_or(defaults.base_url);

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout_secs: parse_env("MEDIAVAULT_REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout_secs),
            upload_timeout_secs: parse_env("MEDIAVAULT_UPLOAD_TIMEOUT_SECS")
                .unwrap_or(defaults.upload_timeout_secs),
            max_concurrent_uploads: parse_env("MEDIAVAULT_MAX_CONCURRENT_UPLOADS")
                .unwrap_or(defaults.max_concurrent_uploads),
            base_path: env::var("MEDIAVAULT_BASE_PATH")
                .map(|p| p.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_path),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = ClientConfig::default();
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.upload_timeout_secs, 300);
        assert!(config.upload_timeout_secs > config.request_timeout_secs);
        assert_eq!(config.max_concurrent_uploads, 4);
        assert!(config.base_path.is_empty());
    }
}
