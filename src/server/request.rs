use crate::error::ProcedureError;
use crate::schema::ValidationIssue;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Request headers with lowercase names; lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct Headers(BTreeMap<String, String>);

impl Headers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Insert, replacing any value stored under the same name in any case.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_ascii_lowercase(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, String>> for Headers {
    fn from(map: BTreeMap<String, String>) -> Self {
        let mut headers = Headers::new();
        for (k, v) in map {
            headers.insert(&k, v);
        }
        headers
    }
}

impl From<Headers> for BTreeMap<String, String> {
    fn from(headers: Headers) -> Self {
        headers.0
    }
}

/// `requestContext.http` of the platform event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpDescription {
    pub method: String,
    pub path: String,
    pub source_ip: String,
    pub user_agent: String,
}

/// `requestContext` of the platform event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventRequestContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub http: HttpDescription,
}

/// One inbound request as delivered by the serverless platform.
///
/// Shaped like an HTTP API (payload v2) proxy event; every field except
/// method and path may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransportEvent {
    pub raw_path: String,
    pub raw_query_string: String,
    pub headers: Headers,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_string_parameters: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_parameters: Option<BTreeMap<String, String>>,
    pub request_context: EventRequestContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub is_base64_encoded: bool,
}

impl TransportEvent {
    /// Build an event for `method` and `path`. `path` may carry a `?query`.
    pub fn new(method: impl Into<String>, path: &str) -> Self {
        let (raw_path, raw_query) = match path.split_once('?') {
            Some((p, q)) => (p.to_string(), q.to_string()),
            None => (path.to_string(), String::new()),
        };
        Self {
            request_context: EventRequestContext {
                request_id: None,
                http: HttpDescription {
                    method: method.into(),
                    path: raw_path.clone(),
                    ..HttpDescription::default()
                },
            },
            raw_path,
            raw_query_string: raw_query,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Method token exactly as delivered.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.request_context.http.method
    }

    /// Raw path, falling back to `requestContext.http.path`.
    #[must_use]
    pub fn path(&self) -> &str {
        if self.raw_path.is_empty() {
            &self.request_context.http.path
        } else {
            &self.raw_path
        }
    }

    /// Query parameters: the platform's parsed map when present, otherwise
    /// parsed from the raw query string (last value wins on repeats).
    #[must_use]
    pub fn query_params(&self) -> BTreeMap<String, String> {
        match &self.query_string_parameters {
            Some(params) => params.clone(),
            None => parse_query_string(&self.raw_query_string),
        }
    }

    /// Body text after base64 decoding; `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the body is flagged base64 but does not
    /// decode to UTF-8 text.
    pub fn decoded_body(&self) -> Result<Option<String>, ProcedureError> {
        let Some(body) = &self.body else {
            return Ok(None);
        };
        if !self.is_base64_encoded {
            return Ok(Some(body.clone()));
        }
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(body.trim())
            .map_err(|e| {
                ProcedureError::validation(vec![ValidationIssue::new(
                    "",
                    format!("Body is not valid base64: {e}"),
                )])
            })?;
        String::from_utf8(bytes).map(Some).map_err(|e| {
            ProcedureError::validation(vec![ValidationIssue::new(
                "",
                format!("Body is not valid UTF-8: {e}"),
            )])
        })
    }
}

/// Parse a form-urlencoded query string (without the leading `?`).
#[must_use]
pub fn parse_query_string(query: &str) -> BTreeMap<String, String> {
    url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
