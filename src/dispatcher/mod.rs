//! # Dispatcher Module
//!
//! Translates one transport event into a procedure invocation and back.
//!
//! ## Request Flow
//!
//! 1. Strip the reverse-proxy prefix from the path and drop a trailing slash
//! 2. `/docs` short-circuits to the HTML documentation page
//! 3. Resolve `(method, path)` against the router; a miss is `NOT_FOUND`
//! 4. Build the [`RequestContext`](crate::typed::RequestContext) from headers
//! 5. Assemble raw input (query parameters or JSON body, plus path parameters)
//! 6. Validate the input; violations are `VALIDATION_ERROR` and the handler
//!    is not called
//! 7. Invoke the handler under `catch_unwind`
//! 8. Validate the output and wrap it in a `200` JSON response
//!
//! ## Error Handling
//!
//! Every failure is mapped to the error envelope and its status code:
//! - Validation failures and malformed bodies return `400`
//! - Unknown routes and missing entities return `404`
//! - Handler panics, handler/schema drift and serialization faults return
//!   `500` with a generic message; the detail is attached as `cause` only in
//!   `dev`

mod core;

pub use self::core::{build_context, normalize_path, Dispatcher, DEFAULT_PROXY_PREFIX, DOCS_PATH};
pub(crate) use self::core::panic_message;
