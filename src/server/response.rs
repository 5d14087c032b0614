use crate::config::Environment;
use crate::error::ProcedureError;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Fallback body used if an envelope cannot be serialized.
const FALLBACK_ERROR_BODY: &str =
    r#"{"code":"INTERNAL_ERROR","message":"Unexpected Error Occurred"}"#;

/// Outbound response in the proxy-result shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportResponse {
    pub status_code: u16,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl TransportResponse {
    pub fn new(status: StatusCode, content_type: &str, body: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), content_type.to_string());
        Self {
            status_code: status.as_u16(),
            headers,
            body: body.into(),
            is_base64_encoded: false,
        }
    }

    #[must_use]
    pub fn json(status: StatusCode, body: &Value) -> Self {
        Self::new(status, "application/json", body.to_string())
    }

    pub fn html(body: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, "text/html", body)
    }

    /// Empty `204` answering a preflight, with the `allow` header set.
    #[must_use]
    pub fn no_content(allow: &str) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("allow".to_string(), allow.to_string());
        Self {
            status_code: StatusCode::NO_CONTENT.as_u16(),
            headers,
            body: String::new(),
            is_base64_encoded: false,
        }
    }

    /// Error envelope response; the cause is dropped in `prod`.
    #[must_use]
    pub fn error(err: &ProcedureError, environment: Environment) -> Self {
        let envelope = err.to_envelope(environment);
        let body =
            serde_json::to_string(&envelope).unwrap_or_else(|_| FALLBACK_ERROR_BODY.to_string());
        Self::new(err.status(), "application/json", body)
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parse the body as JSON.
    pub fn body_json(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }
}
