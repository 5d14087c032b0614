use crate::error::ProcedureError;
use crate::ids::RequestId;
use crate::schema::Schema;
use http::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Per-invocation facts derived from the transport event.
///
/// Read-only for handlers; dropped when the invocation ends. Every field has
/// an empty default so building one never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: RequestId,
    /// Platform-assigned id (`requestContext.requestId`), kept verbatim
    pub platform_request_id: Option<String>,
    /// Caller IP (`x-forwarded-for`, falling back to the platform source IP)
    pub ip: String,
    /// Caller user agent
    pub user_agent: String,
}

/// Whether a procedure reads (`Query`) or changes (`Mutation`) state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcedureKind {
    Query,
    Mutation,
}

impl ProcedureKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProcedureKind::Query => "query",
            ProcedureKind::Mutation => "mutation",
        }
    }

    /// HTTP verb used when the definition does not override it.
    #[must_use]
    pub fn default_method(self) -> Method {
        match self {
            ProcedureKind::Query => Method::GET,
            ProcedureKind::Mutation => Method::POST,
        }
    }
}

impl fmt::Display for ProcedureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input type for procedures that take no input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NoInput {}

/// Trait implemented by typed procedure handlers.
///
/// A handler receives input that already passed the procedure's input schema,
/// deserialized into `Self::Input`, and returns a value serialized back to
/// JSON and checked against the output schema by the dispatcher.
pub trait Handler: Send + Sync + 'static {
    /// Typed input (deserialized from the validated JSON)
    type Input: DeserializeOwned;
    /// Typed output (serialized to JSON)
    type Output: Serialize;

    /// Run the procedure.
    ///
    /// Expected failures (e.g. missing entity) are returned as
    /// [`ProcedureError`]; panics are caught by the dispatcher and reported as
    /// internal errors.
    fn handle(
        &self,
        input: Self::Input,
        ctx: &RequestContext,
    ) -> Result<Self::Output, ProcedureError>;
}

/// Type-erased handler stored in a [`ProcedureDefinition`].
pub type ErasedHandler =
    Arc<dyn Fn(Value, &RequestContext) -> Result<Value, ProcedureError> + Send + Sync>;

fn erase<H: Handler>(handler: H) -> ErasedHandler {
    Arc::new(move |input: Value, ctx: &RequestContext| {
        let typed: H::Input = serde_json::from_value(input).map_err(|e| {
            ProcedureError::internal(format!("validated input does not fit handler type: {e}"))
        })?;
        let output = handler.handle(typed, ctx)?;
        serde_json::to_value(output)
            .map_err(|e| ProcedureError::internal(format!("failed to serialize output: {e}")))
    })
}

/// One named RPC with its HTTP binding, schemas and handler.
#[derive(Clone)]
pub struct ProcedureDefinition {
    pub name: String,
    pub kind: ProcedureKind,
    pub method: Method,
    /// Path pattern, e.g. `/pets/{pet_id}`
    pub path_pattern: String,
    pub input_schema: Schema,
    pub output_schema: Schema,
    /// Human readable summary used by the documentation generator
    pub summary: Option<String>,
    /// Grouping tags used by the documentation generator
    pub tags: Vec<String>,
    handler: ErasedHandler,
}

impl ProcedureDefinition {
    /// Declare a read-only procedure, bound to `GET` unless overridden.
    pub fn query<H: Handler>(
        name: impl Into<String>,
        path_pattern: impl Into<String>,
        input_schema: Schema,
        output_schema: Schema,
        handler: H,
    ) -> Self {
        Self::new(
            name,
            ProcedureKind::Query,
            path_pattern,
            input_schema,
            output_schema,
            handler,
        )
    }

    /// Declare a side-effecting procedure, bound to `POST` unless overridden.
    pub fn mutation<H: Handler>(
        name: impl Into<String>,
        path_pattern: impl Into<String>,
        input_schema: Schema,
        output_schema: Schema,
        handler: H,
    ) -> Self {
        Self::new(
            name,
            ProcedureKind::Mutation,
            path_pattern,
            input_schema,
            output_schema,
            handler,
        )
    }

    pub fn new<H: Handler>(
        name: impl Into<String>,
        kind: ProcedureKind,
        path_pattern: impl Into<String>,
        input_schema: Schema,
        output_schema: Schema,
        handler: H,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            method: kind.default_method(),
            path_pattern: path_pattern.into(),
            input_schema,
            output_schema,
            summary: None,
            tags: Vec::new(),
            handler: erase(handler),
        }
    }

    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Invoke the handler with already validated input.
    pub fn call(&self, input: Value, ctx: &RequestContext) -> Result<Value, ProcedureError> {
        (self.handler)(input, ctx)
    }

    /// Placeholder names in path order, e.g. `["pet_id"]` for `/pets/{pet_id}`.
    #[must_use]
    pub fn path_placeholders(&self) -> Vec<&str> {
        self.path_pattern
            .split('/')
            .filter_map(|seg| seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')))
            .collect()
    }
}

impl fmt::Debug for ProcedureDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcedureDefinition")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("method", &self.method)
            .field("path_pattern", &self.path_pattern)
            .field("input_schema", &self.input_schema)
            .field("output_schema", &self.output_schema)
            .finish_non_exhaustive()
    }
}
