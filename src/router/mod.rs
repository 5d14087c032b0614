//! # Router Module
//!
//! The procedure registry and route resolution.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Validating procedure definitions once, at startup (unique names, unique
//!   `(method, path)` bindings, well-formed patterns, bound placeholders)
//! - Resolving an incoming method and path to a procedure
//! - Extracting path parameters from the matched pattern
//! - Exposing the ordered procedure list to the documentation generator
//!
//! ## Architecture
//!
//! 1. **Compilation**: [`RouterBuilder::build`] turns each pattern such as
//!    `/pets/{pet_id}` into an anchored regex and records the placeholder
//!    names.
//!
//! 2. **Matching**: [`Router::resolve`] tests the path against the compiled
//!    patterns in registration order. The first match wins, so when two
//!    patterns could match the same literal path the earlier registration is
//!    used.
//!
//! ## Example
//!
//! ```rust,ignore
//! use pets_api::router::Router;
//! use http::Method;
//!
//! let router = Router::builder().procedure(get_pet).build()?;
//! if let Some(m) = router.resolve(&Method::GET, "/pets/1") {
//!     assert_eq!(m.get_path_param("pet_id"), Some("1"));
//! }
//! ```
//!
//! An unregistered method on a registered path does not resolve; callers
//! report it as `NOT_FOUND` like any other miss.

mod core;

pub use self::core::{ParamVec, RouteMatch, Router, RouterBuilder, RouterError, MAX_INLINE_PARAMS};
