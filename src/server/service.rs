use super::request::TransportEvent;
use super::response::TransportResponse;
use crate::config::ApiEnv;
use crate::dispatcher::{panic_message, Dispatcher};
use crate::error::ProcedureError;
use crate::logging::{redact_headers, RedactionLevel};
use crate::openapi::DocMeta;
use crate::router::Router;
use crate::schema::ValidationIssue;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error};

/// Serialized response used if a response cannot itself be serialized.
const FALLBACK_RESPONSE: &str = r#"{"statusCode":500,"headers":{"content-type":"application/json"},"body":"{\"code\":\"INTERNAL_ERROR\",\"message\":\"Unexpected Error Occurred\"}","isBase64Encoded":false}"#;

/// The function entry point.
///
/// Holds the configuration resolved once at startup and delegates every event
/// to the [`Dispatcher`]. `handle` always returns a response: a fault that
/// escapes the dispatcher is converted to `INTERNAL_ERROR` here.
#[derive(Debug, Clone)]
pub struct LambdaHandler {
    dispatcher: Dispatcher,
    redaction: RedactionLevel,
}

impl LambdaHandler {
    pub fn new(router: Router, env: ApiEnv) -> Self {
        Self::from_shared(Arc::new(router), env)
    }

    pub fn from_shared(router: Arc<Router>, env: ApiEnv) -> Self {
        Self {
            dispatcher: Dispatcher::new(router, env),
            redaction: RedactionLevel::Credentials,
        }
    }

    #[must_use]
    pub fn with_proxy_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.dispatcher = self.dispatcher.with_proxy_prefix(prefix);
        self
    }

    #[must_use]
    pub fn with_doc_meta(mut self, meta: &DocMeta) -> Self {
        self.dispatcher = self.dispatcher.with_doc_meta(meta);
        self
    }

    /// Redaction applied to headers in the logged event.
    #[must_use]
    pub fn with_redaction(mut self, level: RedactionLevel) -> Self {
        self.redaction = level;
        self
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Handle one event.
    #[must_use]
    pub fn handle(&self, event: TransportEvent) -> TransportResponse {
        if tracing::enabled!(tracing::Level::DEBUG) {
            let mut logged = event.clone();
            logged.headers = redact_headers(&event.headers, self.redaction);
            debug!(event = ?logged, "EVENT");
        }

        let environment = self.dispatcher.env().environment;
        let response = match catch_unwind(AssertUnwindSafe(|| self.dispatcher.dispatch(&event))) {
            Ok(response) => response,
            Err(panic) => {
                let panic_message = panic_message(panic.as_ref());
                error!(
                    method = %event.method(),
                    path = %event.path(),
                    panic_message = %panic_message,
                    "Dispatch panicked - CRITICAL"
                );
                TransportResponse::error(
                    &ProcedureError::internal(format!("dispatch panicked: {panic_message}")),
                    environment,
                )
            }
        };

        debug!(
            status = response.status_code,
            response = ?response,
            "RESPONSE"
        );
        response
    }

    /// Handle one event given as JSON, returning the response as JSON.
    ///
    /// An event that does not parse is answered with `VALIDATION_ERROR`.
    #[must_use]
    pub fn handle_json(&self, raw_event: &str) -> String {
        let response = match serde_json::from_str::<TransportEvent>(raw_event) {
            Ok(event) => self.handle(event),
            Err(e) => {
                let err = ProcedureError::validation(vec![ValidationIssue::new(
                    "",
                    format!("Malformed transport event: {e}"),
                )]);
                TransportResponse::error(&err, self.dispatcher.env().environment)
            }
        };
        serde_json::to_string(&response).unwrap_or_else(|e| {
            error!(error = %e, "Response serialization failed");
            FALLBACK_RESPONSE.to_string()
        })
    }
}
