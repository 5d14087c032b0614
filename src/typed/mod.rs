//! # Typed Procedures
//!
//! Procedure declarations: the [`Handler`] trait implemented by business logic,
//! the [`ProcedureDefinition`] binding a handler to a name, an HTTP verb, a path
//! pattern and input/output [`Schema`](crate::schema::Schema)s, and the
//! [`RequestContext`] handed to every call.
//!
//! ```rust,ignore
//! use pets_api::typed::{Handler, ProcedureDefinition, RequestContext};
//!
//! let def = ProcedureDefinition::query("petGet", "/pets/{pet_id}", input, output, GetPet::new(store))
//!     .summary("Fetch a single pet");
//! ```

mod core;

pub use self::core::{
    ErasedHandler, Handler, NoInput, ProcedureDefinition, ProcedureKind, RequestContext,
};
