//! Backend response envelopes.
//!
//! Every backend response is wrapped: success as
//! `{success: true, message, data?}`, failure as
//! `{success: false, message, status_code, detail?}`. A 2xx transport status
//! with `success != true` is still a failure; callers must check `success`
//! rather than the HTTP status alone.

use serde::{Deserialize, Serialize};

use super::PageMeta;

/// Uniform envelope for single-object responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// Envelope for paginated list responses, carrying `meta` beside `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

/// Error envelope body, parsed from non-2xx responses so the transport can
/// surface the backend's human-readable message.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_parses() {
        let body = r#"{"success":true,"message":"ok","data":{"token":"t"}}"#;
        let env: Envelope<serde_json::Value> = serde_json::from_str(body).unwrap();
        assert!(env.success);
        assert_eq!(env.message, "ok");
        assert!(env.data.is_some());
        assert!(env.status_code.is_none());
    }

    #[test]
    fn failure_envelope_on_2xx_body() {
        let body = r#"{"success":false,"message":"quota exceeded","status_code":402}"#;
        let env: Envelope<serde_json::Value> = serde_json::from_str(body).unwrap();
        assert!(!env.success);
        assert_eq!(env.status_code, Some(402));
    }

    #[test]
    fn error_envelope_tolerates_missing_detail() {
        let body = r#"{"success":false,"message":"nope","status_code":403}"#;
        let env: ErrorEnvelope = serde_json::from_str(body).unwrap();
        assert!(!env.success);
        assert_eq!(env.message, "nope");
        assert!(env.detail.is_none());
    }
}
