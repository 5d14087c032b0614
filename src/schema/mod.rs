//! # Schema Module
//!
//! Structural schemas shared by the dispatcher (runtime validation) and the
//! documentation generator (introspection).
//!
//! A [`Schema`] is plain data: a tagged variant over string, number, integer,
//! boolean, array and object, with nested field lists. The same value is
//!
//! - applied with [`Schema::validate`], which returns the cleaned value or a
//!   [`ValidationError`] listing every violation, and
//! - rendered with [`Schema::to_json_schema`] for the API description.
//!
//! ## Parameter coercion
//!
//! Path and query parameters always arrive as strings. [`Schema::coerce_param`]
//! converts such a string to the JSON type declared for the target field before
//! validation runs. JSON bodies are never coerced.
//!
//! ```rust
//! use pets_api::schema::{Field, Schema};
//! use serde_json::json;
//!
//! let input = Schema::object(vec![Field::required("pet_id", Schema::Integer)]);
//! let raw = json!({ "pet_id": input.coerce_param("pet_id", "7") });
//! assert_eq!(input.validate(&raw).unwrap(), json!({ "pet_id": 7 }));
//! ```

mod types;
mod validate;

pub use types::{Field, Schema};
pub use validate::{ValidationError, ValidationIssue};
