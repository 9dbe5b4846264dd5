//! Metadata validation module
//!
//! Provides the client-side format rules for upload metadata entries:
//! - Name validation: max length
//! - Value validation: per entry type (url, number, text); empty is always
//!   valid, non-empty url/number values must parse
//!
//! These checks run before encoding; a failing entry never reaches the
//! network.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::VaultError;
use crate::models::{MetaEntry, MetaEntryType, UploadItem};

/// Maximum length for metadata entry names (256 characters).
pub const META_NAME_MAX_LENGTH: usize = 256;

/// Maximum length for metadata entry values (2048 characters).
pub const META_VALUE_MAX_LENGTH: usize = 2048;

fn url_regex() -> &'static Regex {
    static URL_RE: OnceLock<Regex> = OnceLock::new();
    URL_RE.get_or_init(|| {
        Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("url validation regex is valid")
    })
}

/// Whether a string is an http(s) URL.
pub fn is_url(value: &str) -> bool {
    url_regex().is_match(value.trim())
}

/// Whether a string parses as a finite number.
pub fn is_numeric(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .map(|n| n.is_finite())
        .unwrap_or(false)
}

/// Validate a metadata value against its type-specific rule.
///
/// An empty (or whitespace-only) value is valid for every type. Non-empty
/// values: url must be an http(s) URL, number must parse; input/free-text
/// are only length-checked.
pub fn validate_meta_value(value: &str, entry_type: MetaEntryType) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return true;
    }
    if value.len() > META_VALUE_MAX_LENGTH {
        return false;
    }
    match entry_type {
        MetaEntryType::Url => is_url(value),
        MetaEntryType::Number => is_numeric(value),
        MetaEntryType::Input | MetaEntryType::Text => true,
    }
}

/// Validate one metadata entry: name length plus the value rule for its type.
pub fn validate_meta_entry(entry: &MetaEntry) -> Result<(), VaultError> {
    if entry.name.trim().len() > META_NAME_MAX_LENGTH {
        return Err(VaultError::Validation(format!(
            "Metadata name '{}' exceeds maximum length of {} characters",
            entry.name, META_NAME_MAX_LENGTH
        )));
    }
    if !validate_meta_value(&entry.value, entry.entry_type) {
        return Err(VaultError::Validation(format!(
            "Metadata value for '{}' is not a valid {} value",
            entry.name, entry.entry_type
        )));
    }
    Ok(())
}

/// Validate every metadata entry of every item. This is the caller-side
/// precondition of the batch encoder.
pub fn validate_upload_items(items: &[UploadItem]) -> Result<(), VaultError> {
    for (ordinal, item) in items.iter().enumerate() {
        for entry in &item.metadata {
            validate_meta_entry(entry).map_err(|e| {
                VaultError::Validation(format!("Item {}: {}", ordinal, e))
            })?;
        }
    }
    Ok(())
}
