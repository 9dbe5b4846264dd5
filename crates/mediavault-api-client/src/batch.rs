//! Batch encoder: one multipart body for an ordered set of upload items.
//!
//! Field convention: a scalar `providerId`, an optional scalar `categoryUid`,
//! then per item at ordinal i a file part `file_{i}`, a scalar `name_{i}`,
//! and a scalar `metadata_{i}` (JSON array of `{name, type, value}`).
//! Ordinals run 0..N-1 contiguously in batch order so the backend can
//! reconstruct exactly N items in the submitted order.

use mediavault_core::models::UploadBatch;
use mediavault_core::validation::validate_upload_items;
use mediavault_core::VaultError;

/// One encoded multipart field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    File { bytes: Vec<u8>, file_name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchField {
    pub name: String,
    pub value: FieldValue,
}

/// Encoded form body, inspectable before being turned into a request.
#[derive(Debug, Clone)]
pub struct EncodedBatch {
    fields: Vec<BatchField>,
}

impl EncodedBatch {
    pub fn fields(&self) -> &[BatchField] {
        &self.fields
    }

    pub fn into_form(self) -> reqwest::multipart::Form {
        let mut form = reqwest::multipart::Form::new();
        for field in self.fields {
            form = match field.value {
                FieldValue::Text(value) => form.text(field.name, value),
                FieldValue::File { bytes, file_name } => form.part(
                    field.name,
                    reqwest::multipart::Part::bytes(bytes).file_name(file_name),
                ),
            };
        }
        form
    }
}

/// Encode a batch into its wire form, consuming it.
///
/// Precondition: every metadata entry has already passed its type-specific
/// rule. The encoder checks the precondition and refuses with
/// [`VaultError::EncodingPrecondition`] rather than re-validating per field.
pub fn encode(batch: UploadBatch) -> Result<EncodedBatch, VaultError> {
    validate_upload_items(&batch.items)
        .map_err(|e| VaultError::EncodingPrecondition(e.to_string()))?;

    let mut fields = vec![BatchField {
        name: "providerId".to_string(),
        value: FieldValue::Text(batch.provider_id.to_string()),
    }];

    if let Some(category) = &batch.category_id {
        let trimmed = category.trim();
        if !trimmed.is_empty() {
            fields.push(BatchField {
                name: "categoryUid".to_string(),
                value: FieldValue::Text(trimmed.to_string()),
            });
        }
    }

    for (i, item) in batch.items.into_iter().enumerate() {
        let name = item.effective_name().to_string();
        let metadata_json = serde_json::to_string(&item.metadata).map_err(|e| {
            VaultError::EncodingPrecondition(format!(
                "Item {}: metadata not serializable: {}",
                i, e
            ))
        })?;
        fields.push(BatchField {
            name: format!("file_{}", i),
            value: FieldValue::File {
                bytes: item.file.bytes,
                file_name: name.clone(),
            },
        });
        fields.push(BatchField {
            name: format!("name_{}", i),
            value: FieldValue::Text(name),
        });
        fields.push(BatchField {
            name: format!("metadata_{}", i),
            value: FieldValue::Text(metadata_json),
        });
    }

    Ok(EncodedBatch { fields })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediavault_core::models::{FileSource, MetaEntry, MetaEntryType, UploadItem};

    fn item(file_name: &str, display_name: &str) -> UploadItem {
        UploadItem::new(
            FileSource::new(file_name, vec![0u8; 4]),
            display_name,
            vec![],
        )
    }

    fn field_names(encoded: &EncodedBatch) -> Vec<&str> {
        encoded.fields().iter().map(|f| f.name.as_str()).collect()
    }

    fn text_value<'a>(encoded: &'a EncodedBatch, name: &str) -> Option<&'a str> {
        encoded.fields().iter().find_map(|f| match (&f.name, &f.value) {
            (n, FieldValue::Text(v)) if n == name => Some(v.as_str()),
            _ => None,
        })
    }

    #[test]
    fn empty_batch_has_only_provider_field() {
        let encoded = encode(UploadBatch::new(9, vec![])).unwrap();
        assert_eq!(field_names(&encoded), vec!["providerId"]);
        assert_eq!(text_value(&encoded, "providerId"), Some("9"));
    }

    #[test]
    fn indices_are_contiguous_and_ordered() {
        let batch = UploadBatch::new(
            1,
            vec![item("a.png", "A"), item("b.png", "B"), item("c.png", "C")],
        );
        let encoded = encode(batch).unwrap();
        assert_eq!(
            field_names(&encoded),
            vec![
                "providerId",
                "file_0",
                "name_0",
                "metadata_0",
                "file_1",
                "name_1",
                "metadata_1",
                "file_2",
                "name_2",
                "metadata_2",
            ]
        );
        assert_eq!(text_value(&encoded, "name_0"), Some("A"));
        assert_eq!(text_value(&encoded, "name_2"), Some("C"));
    }

    #[test]
    fn blank_display_name_falls_back_to_file_name() {
        let encoded = encode(UploadBatch::new(1, vec![item("raw.bin", "")])).unwrap();
        assert_eq!(text_value(&encoded, "name_0"), Some("raw.bin"));
        match &encoded.fields()[1].value {
            FieldValue::File { file_name, .. } => assert_eq!(file_name, "raw.bin"),
            other => panic!("expected file part, got {:?}", other),
        }
    }

    #[test]
    fn category_is_trimmed_and_blank_omitted() {
        let encoded = encode(
            UploadBatch::new(1, vec![]).with_category("  cat-1  "),
        )
        .unwrap();
        assert_eq!(text_value(&encoded, "categoryUid"), Some("cat-1"));

        let encoded = encode(UploadBatch::new(1, vec![]).with_category("   ")).unwrap();
        assert!(text_value(&encoded, "categoryUid").is_none());
    }

    #[test]
    fn metadata_serializes_as_typed_array() {
        let mut with_meta = item("a.png", "A");
        with_meta.metadata = vec![
            MetaEntry::new("source", MetaEntryType::Url, "https://a.example"),
            MetaEntry::new("count", MetaEntryType::Number, "3"),
        ];
        let encoded = encode(UploadBatch::new(1, vec![with_meta])).unwrap();
        let metadata = text_value(&encoded, "metadata_0").unwrap();
        let parsed: serde_json::Value = serde_json::from_str(metadata).unwrap();
        assert_eq!(parsed[0]["type"], "url");
        assert_eq!(parsed[1]["name"], "count");
    }

    #[test]
    fn invalid_metadata_refused_before_encoding() {
        let mut bad = item("a.png", "A");
        bad.metadata = vec![MetaEntry::new("link", MetaEntryType::Url, "not-a-url")];
        let err = encode(UploadBatch::new(1, vec![bad])).unwrap_err();
        assert!(matches!(err, VaultError::EncodingPrecondition(_)));
    }
}
