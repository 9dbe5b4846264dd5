//! Upload domain models: items, batches, and per-item outcomes.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::ErrorKind;

use super::FileRecord;

/// Kind of a metadata entry, deciding the value-format rule applied to it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MetaEntryType {
    #[serde(rename = "url")]
    Url,
    #[serde(rename = "text-input")]
    Input,
    #[serde(rename = "free-text")]
    Text,
    #[serde(rename = "number")]
    Number,
}

impl Display for MetaEntryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MetaEntryType::Url => write!(f, "url"),
            MetaEntryType::Input => write!(f, "text-input"),
            MetaEntryType::Text => write!(f, "free-text"),
            MetaEntryType::Number => write!(f, "number"),
        }
    }
}

impl FromStr for MetaEntryType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "url" => Ok(MetaEntryType::Url),
            "text-input" => Ok(MetaEntryType::Input),
            "free-text" => Ok(MetaEntryType::Text),
            "number" => Ok(MetaEntryType::Number),
            _ => Err(anyhow::anyhow!("Invalid metadata entry type: {}", s)),
        }
    }
}

/// One named metadata value attached to an upload item. Serialized into the
/// batch request as `{name, type, value}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetaEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub entry_type: MetaEntryType,
    pub value: String,
}

impl MetaEntry {
    pub fn new(name: impl Into<String>, entry_type: MetaEntryType, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entry_type,
            value: value.into(),
        }
    }
}

/// File contents plus the original file name, as selected by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSource {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FileSource {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// One file selected for upload, with its display name and metadata.
/// Immutable once submitted to the upload engine.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadItem {
    pub file: FileSource,
    pub display_name: String,
    pub metadata: Vec<MetaEntry>,
}

impl UploadItem {
    pub fn new(file: FileSource, display_name: impl Into<String>, metadata: Vec<MetaEntry>) -> Self {
        Self {
            file,
            display_name: display_name.into(),
            metadata,
        }
    }

    /// Name sent to the backend: the display name when non-empty, otherwise
    /// the original file name.
    pub fn effective_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.file.file_name
        } else {
            &self.display_name
        }
    }
}

/// An ordered set of items uploaded in one wire request, sharing a provider
/// and optional category. Consumed by value by the batch encoder.
#[derive(Debug, Clone)]
pub struct UploadBatch {
    pub provider_id: i64,
    pub category_id: Option<String>,
    pub items: Vec<UploadItem>,
}

impl UploadBatch {
    pub fn new(provider_id: i64, items: Vec<UploadItem>) -> Self {
        Self {
            provider_id,
            category_id: None,
            items,
        }
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }
}

/// Identity of a registered upload item, stable across its lifecycle.
/// Callers reconcile state by handle, never by completion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemHandle(pub u64);

impl Display for ItemHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "item-{}", self.0)
    }
}

/// Lifecycle state of one upload item. Succeeded and Failed are terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Pending,
    InFlight,
    Succeeded(FileRecord),
    Failed { kind: ErrorKind, detail: String },
}

impl UploadOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadOutcome::Succeeded(_) | UploadOutcome::Failed { .. })
    }
}

/// Terminal success of one item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSuccess {
    pub handle: ItemHandle,
    pub ordinal: usize,
    pub record: FileRecord,
}

/// Terminal failure of one item. Never aborts sibling items.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    pub handle: ItemHandle,
    pub ordinal: usize,
    pub kind: ErrorKind,
    pub detail: String,
}

/// Aggregate outcome of a batch: a disjoint, exhaustive partition of the
/// submitted items. Partial success is a valid terminal state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub successful: Vec<ItemSuccess>,
    pub failed: Vec<ItemFailure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.successful.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.successful.is_empty() && self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_entry_type_wire_names() {
        assert_eq!("url".parse::<MetaEntryType>().unwrap(), MetaEntryType::Url);
        assert_eq!(
            "text-input".parse::<MetaEntryType>().unwrap(),
            MetaEntryType::Input
        );
        assert_eq!(
            "free-text".parse::<MetaEntryType>().unwrap(),
            MetaEntryType::Text
        );
        assert_eq!(MetaEntryType::Number.to_string(), "number");
        assert!("date".parse::<MetaEntryType>().is_err());
    }

    #[test]
    fn meta_entry_serializes_type_field() {
        let entry = MetaEntry::new("source", MetaEntryType::Url, "https://a.example");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains(r#""type":"url""#));
    }

    #[test]
    fn effective_name_falls_back_to_file_name() {
        let item = UploadItem::new(FileSource::new("raw.bin", vec![1, 2]), "", vec![]);
        assert_eq!(item.effective_name(), "raw.bin");

        let item = UploadItem::new(FileSource::new("raw.bin", vec![1, 2]), "Nice name", vec![]);
        assert_eq!(item.effective_name(), "Nice name");
    }

    #[test]
    fn outcome_terminality() {
        assert!(!UploadOutcome::Pending.is_terminal());
        assert!(!UploadOutcome::InFlight.is_terminal());
        assert!(UploadOutcome::Failed {
            kind: ErrorKind::Timeout,
            detail: "deadline".to_string()
        }
        .is_terminal());
    }
}
