//! Durable client-side state: one JSON file per key under a state directory.
//!
//! Each stored value is wrapped with an optional expiry timestamp and is
//! treated as absent once expired. Malformed files are removed on read, never
//! retried.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use mediavault_core::VaultError;

#[derive(Debug, Serialize, Deserialize)]
struct Stored<T> {
    value: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
}

/// Key-value store backed by one JSON file per key.
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub fn new(dir: PathBuf) -> Result<Self, VaultError> {
        fs::create_dir_all(&dir)
            .map_err(|e| VaultError::Storage(format!("Failed to create {}: {}", dir.display(), e)))?;
        Ok(Self { dir })
    }

    /// Open the default state directory: `<config dir>/mediavault`.
    pub fn open_default() -> Result<Self, VaultError> {
        let base = dirs::config_dir()
            .ok_or_else(|| VaultError::Storage("No config directory available".to_string()))?;
        Self::new(base.join("mediavault"))
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Write a value, optionally expiring after `ttl`.
    pub fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<(), VaultError> {
        let stored = Stored {
            value,
            expires_at: ttl.and_then(|d| {
                chrono::Duration::from_std(d)
                    .ok()
                    .map(|d| Utc::now() + d)
            }),
        };
        let body = serde_json::to_vec(&stored)
            .map_err(|e| VaultError::Storage(format!("Failed to serialize '{}': {}", key, e)))?;
        fs::write(self.key_path(key), body)
            .map_err(|e| VaultError::Storage(format!("Failed to write '{}': {}", key, e)))?;
        Ok(())
    }

    /// Read a value. Missing, expired, or malformed entries yield `None`;
    /// expired and malformed files are removed.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.key_path(key);
        let body = fs::read(&path).ok()?;
        let stored: Stored<T> = match serde_json::from_slice(&body) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(key, error = %e, "Removing malformed stored value");
                let _ = fs::remove_file(&path);
                return None;
            }
        };
        if let Some(expires_at) = stored.expires_at {
            if Utc::now() > expires_at {
                let _ = fs::remove_file(&path);
                return None;
            }
        }
        Some(stored.value)
    }

    pub fn remove(&self, key: &str) {
        let _ = fs::remove_file(self.key_path(key));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.key_path(key).exists()
    }
}
