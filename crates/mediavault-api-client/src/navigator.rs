//! Navigation state for the central 401 handler.
//!
//! A 401 clears the session and records a single pending redirect to the
//! login destination. The embedding front end applies the redirect; the
//! client never performs process-level navigation itself. Re-entrant 401s
//! while a redirect is already pending do not stack.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use mediavault_core::constants::LOGIN_PATH;

/// A computed redirect target: login path plus an optional query string
/// (without the leading `?`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRedirect {
    pub path: String,
    pub query: Option<String>,
}

fn normalize(location: &str) -> &str {
    location.trim_end_matches('/')
}

/// Compute the login redirect for a 401 received at `current` (path + query).
///
/// If `current` already equals the login destination (trailing slash
/// ignored) or the application base path, the redirect carries no query so
/// re-authentication cannot loop back to login. Otherwise the pre-401
/// location is preserved, URL-encoded, in a `redirect` parameter.
pub fn login_redirect(current: &str, base_path: &str) -> PendingRedirect {
    let login_path = format!("{}{}", base_path, LOGIN_PATH);
    let at_login = normalize(current) == normalize(&login_path);
    let at_base = normalize(current) == normalize(base_path);
    let query = if at_login || at_base {
        None
    } else {
        Some(format!("redirect={}", urlencoding::encode(current)))
    };
    PendingRedirect {
        path: login_path,
        query,
    }
}

/// Tracks the current client-side location and the pending login redirect.
pub struct Navigator {
    base_path: String,
    current: RwLock<String>,
    pending: Mutex<Option<PendingRedirect>>,
    redirecting: AtomicBool,
}

impl Navigator {
    pub fn new(base_path: impl Into<String>) -> Self {
        let base_path = base_path.into();
        let landing = if base_path.is_empty() {
            "/".to_string()
        } else {
            base_path.clone()
        };
        Self {
            base_path,
            current: RwLock::new(landing),
            pending: Mutex::new(None),
            redirecting: AtomicBool::new(false),
        }
    }

    /// Record the current location (path + query) as navigation happens.
    pub fn set_location(&self, location: impl Into<String>) {
        *self.current.write().expect("navigator lock poisoned") = location.into();
    }

    pub fn current_location(&self) -> String {
        self.current.read().expect("navigator lock poisoned").clone()
    }

    /// Central 401 entry point. Computes and stores the login redirect for
    /// the current location. Runs at most once until the pending redirect is
    /// taken; returns `None` on re-entrant calls.
    pub fn handle_unauthorized(&self) -> Option<PendingRedirect> {
        if self.redirecting.swap(true, Ordering::SeqCst) {
            return None;
        }
        let redirect = login_redirect(&self.current_location(), &self.base_path);
        tracing::warn!(to = %redirect.path, "Session invalidated, redirecting to login");
        *self.pending.lock().expect("navigator lock poisoned") = Some(redirect.clone());
        Some(redirect)
    }

    /// Take the pending redirect, re-arming the 401 handler.
    pub fn take_pending_redirect(&self) -> Option<PendingRedirect> {
        let taken = self.pending.lock().expect("navigator lock poisoned").take();
        if taken.is_some() {
            self.redirecting.store(false, Ordering::SeqCst);
        }
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_preserves_pre_401_location() {
        let redirect = login_redirect("/files?page=2", "");
        assert_eq!(redirect.path, "/login");
        assert_eq!(
            redirect.query.as_deref(),
            Some("redirect=%2Ffiles%3Fpage%3D2")
        );
    }

    #[test]
    fn redirect_from_login_has_no_query() {
        assert_eq!(login_redirect("/login", "").query, None);
        // Trailing slash ignored.
        assert_eq!(login_redirect("/login/", "").query, None);
    }

    #[test]
    fn redirect_from_base_path_has_no_query() {
        assert_eq!(login_redirect("/", "").query, None);
        assert_eq!(login_redirect("/admin", "/admin").query, None);
        assert_eq!(login_redirect("/admin/", "/admin").query, None);
    }

    #[test]
    fn base_path_prefixes_login_destination() {
        let redirect = login_redirect("/admin/files", "/admin");
        assert_eq!(redirect.path, "/admin/login");
        assert_eq!(
            redirect.query.as_deref(),
            Some("redirect=%2Fadmin%2Ffiles")
        );
    }

    #[test]
    fn unauthorized_runs_once_until_taken() {
        let navigator = Navigator::new("");
        navigator.set_location("/users?page=3");

        let first = navigator.handle_unauthorized();
        assert!(first.is_some());
        // A second 401 while the redirect is pending does not stack.
        assert!(navigator.handle_unauthorized().is_none());

        let taken = navigator.take_pending_redirect().unwrap();
        assert_eq!(taken, first.unwrap());
        assert!(navigator.take_pending_redirect().is_none());

        // After the redirect is applied, the handler is re-armed.
        assert!(navigator.handle_unauthorized().is_some());
    }
}
