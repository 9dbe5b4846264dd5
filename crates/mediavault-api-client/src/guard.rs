//! Route guard: per-navigation access decision.
//!
//! Runs synchronously before every navigation, reading only already-loaded
//! session state. No network calls.

use mediavault_core::constants::{DEFAULT_LANDING_PATH, LOGIN_PATH};
use mediavault_core::models::Session;

/// A navigation destination as seen by the guard.
#[derive(Debug, Clone)]
pub struct RouteTarget {
    /// Path without query, e.g. `/files`.
    pub path: String,
    /// Raw query string without the leading `?`, e.g. `page=2`.
    pub query: Option<String>,
    /// Whether the destination is reachable without a session.
    pub public: bool,
    /// Whether the destination is restricted to admin sessions.
    pub requires_admin: bool,
}

impl RouteTarget {
    pub fn public(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: None,
            public: true,
            requires_admin: false,
        }
    }

    pub fn protected(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: None,
            public: false,
            requires_admin: false,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn admin_only(mut self) -> Self {
        self.requires_admin = true;
        self
    }

    /// Path plus query, as carried in a `redirect` parameter.
    pub fn full_path(&self) -> String {
        match &self.query {
            Some(query) if !query.is_empty() => format!("{}?{}", self.path, query),
            _ => self.path.clone(),
        }
    }

    /// Decoded value of the `redirect` query parameter, if present.
    fn redirect_param(&self) -> Option<String> {
        let query = self.query.as_deref()?;
        query.split('&').find_map(|pair| {
            let value = pair.strip_prefix("redirect=")?;
            Some(urlencoding::decode(value).ok()?.into_owned())
        })
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavDecision {
    Allow,
    Redirect { path: String, query: Option<String> },
}

/// Decide whether a navigation may proceed.
///
/// A logged-in user landing on the login page is bounced to the saved
/// `redirect` destination (or the default landing path). A protected target
/// without a session redirects to login, carrying the full original
/// path + query so the user returns after re-authentication.
pub fn decide(target: &RouteTarget, session: &Session) -> NavDecision {
    if target.public {
        if target.path == LOGIN_PATH && session.is_logged_in() {
            let destination = target
                .redirect_param()
                .unwrap_or_else(|| DEFAULT_LANDING_PATH.to_string());
            return NavDecision::Redirect {
                path: destination,
                query: None,
            };
        }
        return NavDecision::Allow;
    }

    if !session.is_logged_in() {
        return NavDecision::Redirect {
            path: LOGIN_PATH.to_string(),
            query: Some(format!(
                "redirect={}",
                urlencoding::encode(&target.full_path())
            )),
        };
    }

    if target.requires_admin && !session.is_admin() {
        return NavDecision::Redirect {
            path: DEFAULT_LANDING_PATH.to_string(),
            query: None,
        };
    }

    NavDecision::Allow
}
