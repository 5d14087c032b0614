//! # pets-api
//!
//! A small schema-typed RPC service for pets, exposed over HTTP through a
//! serverless function adapter, with an OpenAPI description generated from
//! the same procedure definitions that drive validation.
//!
//! ## Architecture
//!
//! - **[`schema`]** - Introspectable schema values: validation with coercion,
//!   and JSON Schema rendering for the docs
//! - **[`typed`]** - Procedure definitions, the typed [`Handler`] trait and the
//!   per-request context
//! - **[`router`]** - Immutable procedure registry built once at startup;
//!   resolves `(method, path)` to a procedure
//! - **[`dispatcher`]** - Turns one transport event into exactly one response
//! - **[`openapi`]** - Pure API description generator and the `/docs` page
//! - **[`server`]** - Platform event/response types and the entry point
//! - **[`pets`]** - The pet store application
//! - **[`config`]**, **[`logging`]**, **[`error`]**, **[`ids`]** - Ambient
//!   concerns
//!
//! ## Request Flow
//!
//! ```text
//! TransportEvent
//!   -> LambdaHandler::handle        (debug log, catch_unwind)
//!   -> Dispatcher::dispatch         (prefix strip, /docs, resolve)
//!   -> Schema::validate(input)      (VALIDATION_ERROR on failure)
//!   -> Handler::handle              (typed; NOT_FOUND etc.)
//!   -> Schema::validate(output)     (INTERNAL_ERROR on drift)
//! TransportResponse
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use pets_api::config::{ApiEnv, Environment};
//! use pets_api::logging::LogConfig;
//! use pets_api::pets::lambda_handler;
//! use pets_api::server::TransportEvent;
//!
//! let env = ApiEnv::new(Environment::Prod);
//! let handler = lambda_handler(env, &LogConfig::for_environment(env.environment)).unwrap();
//! let response = handler.handle(TransportEvent::new("GET", "/api-ingest/pets/1"));
//! assert_eq!(response.status_code, 200);
//! assert_eq!(
//!     response.body_json().unwrap(),
//!     serde_json::json!({"id": 1, "type": "cat", "name": "Molly"})
//! );
//! ```

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod ids;
pub mod logging;
pub mod openapi;
pub mod pets;
pub mod router;
pub mod schema;
pub mod server;
pub mod typed;

pub use config::{ApiEnv, Environment};
pub use error::{ErrorCode, ProcedureError};
pub use router::Router;
pub use server::{LambdaHandler, TransportEvent, TransportResponse};
pub use typed::{Handler, ProcedureDefinition, RequestContext};
