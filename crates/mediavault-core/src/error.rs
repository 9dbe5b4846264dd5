//! Error types module
//!
//! This module provides the error taxonomy used throughout the mediavault
//! client. All errors are unified under the `VaultError` enum: authentication
//! and session failures, transport-level failures (network, timeout, server),
//! and local failures (validation, encoding preconditions, durable storage).

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io;

/// Coarse classification of a [`VaultError`], used by callers that branch on
/// failure category rather than on the full variant (e.g. per-item upload
/// outcomes, retry decisions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Auth,
    SessionExpired,
    Network,
    Timeout,
    Server,
    Validation,
    EncodingPrecondition,
    Storage,
    Internal,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ErrorKind::Auth => write!(f, "auth"),
            ErrorKind::SessionExpired => write!(f, "session_expired"),
            ErrorKind::Network => write!(f, "network"),
            ErrorKind::Timeout => write!(f, "timeout"),
            ErrorKind::Server => write!(f, "server"),
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::EncodingPrecondition => write!(f, "encoding_precondition"),
            ErrorKind::Storage => write!(f, "storage"),
            ErrorKind::Internal => write!(f, "internal"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// Login rejected by the backend. Carries the server message unchanged.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A 401 received during an authenticated call. The session has already
    /// been cleared centrally; this re-surfaces the failure to the caller.
    #[error("Session expired: {0}")]
    SessionExpired(String),

    /// No response received from the backend.
    #[error("Network error: {0}")]
    Network(String),

    /// Client-side deadline exceeded before a response arrived.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The backend responded with a non-success status or envelope.
    #[error("Server error ({status_code}): {message}")]
    Server { status_code: u16, message: String },

    /// Client-side field or metadata rule violation. Never sent to the network.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Caller attempted to encode a batch containing an invalid item.
    #[error("Encoding precondition violated: {0}")]
    EncodingPrecondition(String),

    /// Durable client-side state could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error with source")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for VaultError {
    fn from(err: anyhow::Error) -> Self {
        VaultError::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for VaultError {
    fn from(err: io::Error) -> Self {
        VaultError::Storage(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        VaultError::Storage(format!("JSON error: {}", err))
    }
}

/// Static metadata per variant: (kind, recoverable).
/// Recoverable means the same operation may succeed if retried without any
/// local state change (transient transport conditions).
fn vault_error_static_metadata(err: &VaultError) -> (ErrorKind, bool) {
    match err {
        VaultError::Auth(_) => (ErrorKind::Auth, false),
        VaultError::SessionExpired(_) => (ErrorKind::SessionExpired, false),
        VaultError::Network(_) => (ErrorKind::Network, true),
        VaultError::Timeout(_) => (ErrorKind::Timeout, true),
        VaultError::Server { status_code, .. } => (ErrorKind::Server, *status_code >= 500),
        VaultError::Validation(_) => (ErrorKind::Validation, false),
        VaultError::EncodingPrecondition(_) => (ErrorKind::EncodingPrecondition, false),
        VaultError::Storage(_) => (ErrorKind::Storage, false),
        VaultError::Internal { .. } => (ErrorKind::Internal, false),
    }
}

impl VaultError {
    pub fn kind(&self) -> ErrorKind {
        vault_error_static_metadata(self).0
    }

    pub fn is_recoverable(&self) -> bool {
        vault_error_static_metadata(self).1
    }

    /// Whether the failure was resolved locally, before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Validation | ErrorKind::EncodingPrecondition | ErrorKind::Storage
        )
    }
}
