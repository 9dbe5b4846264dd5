use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Role of an authenticated console user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Uploader,
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Uploader => write!(f, "uploader"),
        }
    }
}

impl FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "uploader" => Ok(UserRole::Uploader),
            _ => Err(anyhow::anyhow!("Invalid user role: {}", s)),
        }
    }
}

/// The authenticated user identity carried by a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub role: UserRole,
}

/// Payload of a successful login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub user: AuthUser,
}

/// In-memory session state: bearer token plus current user.
///
/// Invariant: `token` and `user` are both set or both `None`. All mutation
/// goes through [`Session::set`] and [`Session::clear`] so no reader observes
/// a half-updated pair.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
    user: Option<AuthUser>,
}

impl Session {
    pub fn set(&mut self, token: String, user: AuthUser) {
        self.token = Some(token);
        self.user = Some(user);
    }

    pub fn clear(&mut self) {
        self.token = None;
        self.user = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.user(), Some(user) if user.role == UserRole::Admin)
    }

    pub fn display_name(&self) -> &str {
        self.user().map(|u| u.username.as_str()).unwrap_or("")
    }
}
