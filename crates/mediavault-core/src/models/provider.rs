use serde::{Deserialize, Serialize};

/// A storage-provider option offered by the backend for uploads.
///
/// Read-only to the client; only `is_active` providers are selectable. The
/// provider's settlement mechanics behind `service_endpoint` are opaque here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageProvider {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub service_endpoint: String,
}

/// `data` payload of GET /media/storage-info.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageInfo {
    pub providers: Vec<StorageProvider>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_wire_names_are_camel_case() {
        let body = r#"{"id":3,"name":"warm","isActive":true,"serviceEndpoint":"https://sp.example"}"#;
        let provider: StorageProvider = serde_json::from_str(body).unwrap();
        assert_eq!(provider.id, 3);
        assert!(provider.is_active);

        let out = serde_json::to_string(&provider).unwrap();
        assert!(out.contains("isActive"));
        assert!(out.contains("serviceEndpoint"));
    }
}
