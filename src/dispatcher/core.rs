use crate::config::ApiEnv;
use crate::error::ProcedureError;
use crate::ids::RequestId;
use crate::openapi::{describe, render_docs_page, ApiDescription, DocMeta};
use crate::router::{RouteMatch, Router};
use crate::schema::ValidationIssue;
use crate::server::{TransportEvent, TransportResponse};
use crate::typed::{ProcedureKind, RequestContext};
use http::Method;
use serde_json::{Map, Value};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Path prefix added by the reverse proxy in front of the function.
pub const DEFAULT_PROXY_PREFIX: &str = "/api-ingest";

/// Reserved path serving the interactive documentation page.
pub const DOCS_PATH: &str = "/docs";

/// Turns one transport event into exactly one transport response.
///
/// Cheap to clone; the router and the API description are shared.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    router: Arc<Router>,
    env: ApiEnv,
    proxy_prefix: String,
    description: Arc<ApiDescription>,
}

impl Dispatcher {
    pub fn new(router: Arc<Router>, env: ApiEnv) -> Self {
        let description = Arc::new(describe(&router, &DocMeta::default()));
        Self {
            router,
            env,
            proxy_prefix: DEFAULT_PROXY_PREFIX.to_string(),
            description,
        }
    }

    /// Replace the metadata used for the `/docs` description.
    #[must_use]
    pub fn with_doc_meta(mut self, meta: &DocMeta) -> Self {
        self.description = Arc::new(describe(&self.router, meta));
        self
    }

    /// Prefix stripped from incoming paths; empty disables stripping.
    #[must_use]
    pub fn with_proxy_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.proxy_prefix = prefix.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    #[must_use]
    pub fn env(&self) -> &ApiEnv {
        &self.env
    }

    #[must_use]
    pub fn description(&self) -> &ApiDescription {
        &self.description
    }

    /// Handle one event. Every failure becomes an error envelope response.
    #[must_use]
    pub fn dispatch(&self, event: &TransportEvent) -> TransportResponse {
        let path = normalize_path(event.path(), &self.proxy_prefix);

        if path == DOCS_PATH {
            return self.docs_response();
        }

        match self.try_dispatch(event, &path) {
            Ok(response) => response,
            Err(err) => {
                if err.status().is_server_error() {
                    error!(
                        method = %event.method(),
                        path = %path,
                        code = %err.code,
                        cause = err.cause.as_deref().unwrap_or(""),
                        "Procedure failed"
                    );
                } else {
                    warn!(
                        method = %event.method(),
                        path = %path,
                        code = %err.code,
                        message = %err.message,
                        issues = err.issues.len(),
                        "Request rejected"
                    );
                }
                TransportResponse::error(&err, self.env.environment)
            }
        }
    }

    fn docs_response(&self) -> TransportResponse {
        match render_docs_page(&self.description) {
            Ok(page) => TransportResponse::html(page),
            Err(e) => {
                error!(error = %e, "Docs page rendering failed");
                TransportResponse::error(
                    &ProcedureError::internal(e.to_string()),
                    self.env.environment,
                )
            }
        }
    }

    fn try_dispatch(
        &self,
        event: &TransportEvent,
        path: &str,
    ) -> Result<TransportResponse, ProcedureError> {
        let method = parse_method(event.method(), path)?;

        if method == Method::OPTIONS {
            return self.preflight(path);
        }

        let route = self.router.resolve(&method, path).ok_or_else(|| {
            ProcedureError::not_found(format!("No procedure found on path \"{path}\""))
        })?;

        let ctx = build_context(event);
        let procedure = &route.procedure;

        let raw_input = assemble_input(&route, event)?;
        debug!(
            request_id = %ctx.request_id,
            procedure = %procedure.name,
            raw_input = %raw_input,
            "Input assembled"
        );
        let input = procedure.input_schema.validate(&raw_input)?;

        info!(
            request_id = %ctx.request_id,
            platform_request_id = ctx.platform_request_id.as_deref().unwrap_or(""),
            procedure = %procedure.name,
            kind = %procedure.kind,
            "Procedure execution start"
        );
        let start = Instant::now();

        let output = match catch_unwind(AssertUnwindSafe(|| procedure.call(input, &ctx))) {
            Ok(result) => result?,
            Err(panic) => {
                let panic_message = panic_message(panic.as_ref());
                error!(
                    request_id = %ctx.request_id,
                    procedure = %procedure.name,
                    panic_message = %panic_message,
                    "Handler panicked - CRITICAL"
                );
                return Err(ProcedureError::internal(format!(
                    "handler panicked: {panic_message}"
                )));
            }
        };

        let output = procedure.output_schema.validate(&output).map_err(|e| {
            ProcedureError::internal(format!(
                "output of '{}' does not match its schema: {e}",
                procedure.name
            ))
        })?;

        info!(
            request_id = %ctx.request_id,
            procedure = %procedure.name,
            latency_ms = start.elapsed().as_millis() as u64,
            "Procedure execution complete"
        );

        Ok(TransportResponse::json(http::StatusCode::OK, &output))
    }

    fn preflight(&self, path: &str) -> Result<TransportResponse, ProcedureError> {
        let methods = self.router.allowed_methods(path);
        if methods.is_empty() {
            return Err(ProcedureError::not_found(format!(
                "No procedure found on path \"{path}\""
            )));
        }
        let mut allow: Vec<&str> = methods.iter().map(Method::as_str).collect();
        allow.push(Method::OPTIONS.as_str());
        Ok(TransportResponse::no_content(&allow.join(", ")))
    }
}

/// Strip `prefix` on a segment boundary and drop a single trailing slash.
///
/// `/api-ingest/pets/` becomes `/pets`, `/api-ingest` becomes `/`, and
/// `/api-ingestion` is left alone.
#[must_use]
pub fn normalize_path(raw: &str, prefix: &str) -> String {
    let mut path = raw;
    if !prefix.is_empty() {
        if let Some(rest) = path.strip_prefix(prefix) {
            if rest.is_empty() || rest.starts_with('/') {
                path = rest;
            }
        }
    }

    let mut normalized = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    if normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

fn parse_method(token: &str, path: &str) -> Result<Method, ProcedureError> {
    Method::from_bytes(token.trim().to_ascii_uppercase().as_bytes()).map_err(|_| {
        ProcedureError::not_found(format!("No procedure found on path \"{path}\""))
    })
}

/// Derive the per-invocation context. Never fails; missing data is empty.
#[must_use]
pub fn build_context(event: &TransportEvent) -> RequestContext {
    let http = &event.request_context.http;
    let ip = event
        .headers
        .get("x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(http.source_ip.as_str())
        .to_string();
    let user_agent = event
        .headers
        .get("user-agent")
        .unwrap_or(http.user_agent.as_str())
        .to_string();
    let request_id = RequestId::from_candidates([
        event.headers.get("x-request-id"),
        event.request_context.request_id.as_deref(),
    ]);

    RequestContext {
        request_id,
        platform_request_id: event.request_context.request_id.clone(),
        ip,
        user_agent,
    }
}

/// Build the raw input value for the matched procedure.
///
/// Queries merge query parameters with path parameters; mutations merge the
/// parsed body with path parameters. Path parameters win on collisions. String
/// values are coerced toward the field's declared type.
fn assemble_input(route: &RouteMatch, event: &TransportEvent) -> Result<Value, ProcedureError> {
    let schema = &route.procedure.input_schema;

    let mut input = match route.procedure.kind {
        ProcedureKind::Query => {
            let mut map = Map::new();
            for (key, raw) in event.query_params() {
                let value = schema.coerce_param(&key, &raw);
                map.insert(key, value);
            }
            Value::Object(map)
        }
        ProcedureKind::Mutation => parse_body(event)?,
    };

    if route.path_params.is_empty() {
        return Ok(input);
    }
    if let Value::Object(map) = &mut input {
        for (name, raw) in &route.path_params {
            map.insert(name.to_string(), schema.coerce_param(name, raw));
        }
    }
    Ok(input)
}

fn parse_body(event: &TransportEvent) -> Result<Value, ProcedureError> {
    let body = event.decoded_body()?;
    let Some(text) = body.filter(|b| !b.trim().is_empty()) else {
        return Ok(Value::Object(Map::new()));
    };
    serde_json::from_str(&text).map_err(|e| {
        ProcedureError::validation(vec![ValidationIssue::new(
            "",
            format!("Malformed JSON body: {e}"),
        )])
    })
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
