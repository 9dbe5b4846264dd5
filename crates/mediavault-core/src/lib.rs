//! Mediavault Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! validation shared by the mediavault admin-client components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{ErrorKind, VaultError};
