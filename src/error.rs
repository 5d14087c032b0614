//! # Error Taxonomy
//!
//! Every failure on the dispatch path is one of three codes. Handlers return
//! [`ProcedureError`]; the dispatcher turns it into an [`ErrorEnvelope`] and a
//! status code via [`status_for`].
//!
//! | Code               | Status | Raised by                                   |
//! |--------------------|--------|---------------------------------------------|
//! | `VALIDATION_ERROR` | 400    | input schema checks, body/base64 decoding   |
//! | `NOT_FOUND`        | 404    | route resolution, handlers (missing entity) |
//! | `INTERNAL_ERROR`   | 500    | handler faults, output drift, panics        |

use crate::config::Environment;
use crate::schema::ValidationIssue;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Generic message returned for every internal fault.
pub const INTERNAL_ERROR_MESSAGE: &str = "Unexpected Error Occurred";

/// Symbolic error code carried in the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    NotFound,
    InternalError,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map an error code to its HTTP status. Total over [`ErrorCode`].
#[must_use]
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Typed failure of a procedure call or of the dispatch machinery around it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureError {
    pub code: ErrorCode,
    pub message: String,
    /// Underlying detail. Only ever surfaced to callers in `dev`.
    pub cause: Option<String>,
    /// Violations, populated for [`ErrorCode::ValidationError`].
    pub issues: Vec<ValidationIssue>,
}

impl ProcedureError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            cause: None,
            issues: Vec::new(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Build a validation error listing every violation.
    #[must_use]
    pub fn validation(issues: Vec<ValidationIssue>) -> Self {
        let message = match issues.as_slice() {
            [] => "Input validation failed".to_string(),
            [single] => format!("Input validation failed: {single}"),
            many => format!("Input validation failed with {} issues", many.len()),
        };
        Self {
            code: ErrorCode::ValidationError,
            message,
            cause: None,
            issues,
        }
    }

    /// Internal fault with the generic message; `cause` keeps the detail.
    pub fn internal(cause: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, INTERNAL_ERROR_MESSAGE).with_cause(cause)
    }

    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        status_for(self.code)
    }

    /// Build the response body for this error under the given environment.
    ///
    /// In `prod` the cause is dropped unconditionally.
    #[must_use]
    pub fn to_envelope(&self, environment: Environment) -> ErrorEnvelope {
        ErrorEnvelope {
            code: self.code,
            message: self.message.clone(),
            cause: self.cause.clone().filter(|_| environment.is_dev()),
            issues: if self.issues.is_empty() {
                None
            } else {
                Some(self.issues.clone())
            },
        }
    }
}

impl fmt::Display for ProcedureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, " ({cause})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ProcedureError {}

impl From<crate::schema::ValidationError> for ProcedureError {
    fn from(err: crate::schema::ValidationError) -> Self {
        ProcedureError::validation(err.issues)
    }
}

/// Canonical error body. Always fully built before serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<ValidationIssue>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping_is_total() {
        assert_eq!(status_for(ErrorCode::ValidationError), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorCode::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(ErrorCode::InternalError),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_code_serializes_as_symbol() {
        let json = serde_json::to_string(&ErrorCode::NotFound).unwrap();
        assert_eq!(json, "\"NOT_FOUND\"");
        assert_eq!(ErrorCode::ValidationError.to_string(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_cause_only_in_dev() {
        let err = ProcedureError::internal("db exploded");
        let dev = err.to_envelope(Environment::Dev);
        let prod = err.to_envelope(Environment::Prod);
        assert_eq!(dev.cause.as_deref(), Some("db exploded"));
        assert_eq!(prod.cause, None);
        assert_eq!(dev.message, INTERNAL_ERROR_MESSAGE);
        assert_eq!(prod.message, INTERNAL_ERROR_MESSAGE);

        let body = serde_json::to_value(&prod).unwrap();
        assert!(body.get("cause").is_none());
        assert!(body.get("issues").is_none());
    }

    #[test]
    fn test_validation_envelope_lists_issues() {
        let err = ProcedureError::validation(vec![
            ValidationIssue::new("name", "Required"),
            ValidationIssue::new("type", "Expected string, received number"),
        ]);
        let envelope = err.to_envelope(Environment::Prod);
        assert_eq!(envelope.code, ErrorCode::ValidationError);
        assert_eq!(envelope.issues.as_ref().map(Vec::len), Some(2));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
