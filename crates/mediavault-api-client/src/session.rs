//! Session store: owns the bearer token and current-user identity.
//!
//! Single-writer shared state. The transport reads the token through this
//! store on every outgoing request, so every mutation is visible to the next
//! request with no stale snapshot. Token and user always move together; no
//! reader observes a half-updated pair.

use std::sync::{Arc, RwLock};

use mediavault_core::constants::{STORAGE_KEY_TOKEN, STORAGE_KEY_USER};
use mediavault_core::models::{AuthUser, Session};

use crate::storage::StateStore;

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<Session>>,
    storage: Arc<StateStore>,
}

impl SessionStore {
    pub fn new(storage: StateStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Session::default())),
            storage: Arc::new(storage),
        }
    }

    /// Atomically set token and user, persisting both durable keys.
    pub fn set_auth(&self, token: String, user: AuthUser) {
        {
            let mut session = self.inner.write().expect("session lock poisoned");
            session.set(token.clone(), user.clone());
        }
        if let Err(e) = self.storage.set(STORAGE_KEY_TOKEN, &token, None) {
            tracing::warn!(error = %e, "Failed to persist token");
        }
        if let Err(e) = self.storage.set(STORAGE_KEY_USER, &user, None) {
            tracing::warn!(error = %e, "Failed to persist user");
        }
    }

    /// Clear in-memory and persisted state. Idempotent.
    pub fn logout(&self) {
        {
            let mut session = self.inner.write().expect("session lock poisoned");
            session.clear();
        }
        self.storage.remove(STORAGE_KEY_TOKEN);
        self.storage.remove(STORAGE_KEY_USER);
    }

    /// Restore token and user from durable storage at process start. A
    /// partial or malformed pair is corrupt: both sides are cleared and the
    /// session stays empty.
    pub fn restore(&self) {
        let token: Option<String> = self.storage.get(STORAGE_KEY_TOKEN);
        let user: Option<AuthUser> = self.storage.get(STORAGE_KEY_USER);
        match (token, user) {
            (Some(token), Some(user)) => {
                let mut session = self.inner.write().expect("session lock poisoned");
                session.set(token, user);
            }
            (None, None) => {}
            _ => {
                tracing::warn!("Partial persisted session found, clearing both keys");
                self.logout();
            }
        }
    }

    pub fn token(&self) -> Option<String> {
        self.inner
            .read()
            .expect("session lock poisoned")
            .token()
            .map(str::to_string)
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.inner
            .read()
            .expect("session lock poisoned")
            .user()
            .cloned()
    }

    pub fn is_logged_in(&self) -> bool {
        self.inner
            .read()
            .expect("session lock poisoned")
            .is_logged_in()
    }

    /// Point-in-time copy of the session, for synchronous consumers such as
    /// the route guard.
    pub fn snapshot(&self) -> Session {
        self.inner.read().expect("session lock poisoned").clone()
    }
}
