//! # Pets
//!
//! The pet store application: data model, in-memory store, the three
//! procedures and the router wiring them together.
//!
//! | Procedure   | Kind     | Binding              | Input          | Output  |
//! |-------------|----------|----------------------|----------------|---------|
//! | `petGetAll` | query    | `GET /pets`          | none           | `Pet[]` |
//! | `petCreate` | mutation | `POST /pets`         | `{type, name}` | `Pet[]` |
//! | `petGet`    | query    | `GET /pets/{pet_id}` | `{pet_id}`     | `Pet`   |

pub mod controllers;
pub mod model;
pub mod store;

pub use controllers::{CreatePetController, GetPetController, ListPetsController};
pub use model::{new_pet_schema, pet_id_schema, pet_schema, NewPet, Pet, PetIdInput};
pub use store::{seed_pets, PetStore, MAX_PET_ID};

use crate::config::ApiEnv;
use crate::logging::LogConfig;
use crate::openapi::DocMeta;
use crate::router::{Router, RouterError};
use crate::schema::Schema;
use crate::server::LambdaHandler;
use crate::typed::ProcedureDefinition;
use std::sync::Arc;

/// Register the pet procedures against `store`.
///
/// # Errors
///
/// Only if the definitions below are inconsistent; see [`RouterError`].
pub fn app_router(store: Arc<PetStore>) -> Result<Router, RouterError> {
    Router::builder()
        .procedure(
            ProcedureDefinition::query(
                "petGetAll",
                "/pets",
                Schema::Empty,
                Schema::array(pet_schema()),
                ListPetsController::new(Arc::clone(&store)),
            )
            .summary("List all pets")
            .tag("pets"),
        )
        .procedure(
            ProcedureDefinition::mutation(
                "petCreate",
                "/pets",
                new_pet_schema(),
                Schema::array(pet_schema()),
                CreatePetController::new(Arc::clone(&store)),
            )
            .summary("Create a pet")
            .tag("pets"),
        )
        .procedure(
            ProcedureDefinition::query(
                "petGet",
                "/pets/{pet_id}",
                pet_id_schema(),
                pet_schema(),
                GetPetController::new(store),
            )
            .summary("Get a pet by id")
            .tag("pets"),
        )
        .build()
}

/// Entry point over a freshly seeded store, logging events with the
/// redaction from `log_config`.
///
/// # Errors
///
/// See [`app_router`].
pub fn lambda_handler(env: ApiEnv, log_config: &LogConfig) -> Result<LambdaHandler, RouterError> {
    let router = app_router(Arc::new(PetStore::seeded()))?;
    Ok(LambdaHandler::new(router, env)
        .with_doc_meta(&doc_meta())
        .with_redaction(log_config.redact_level))
}

/// Metadata for the generated API description.
#[must_use]
pub fn doc_meta() -> DocMeta {
    DocMeta {
        title: "Pets API".to_string(),
        description: "Pets API".to_string(),
        version: "-".to_string(),
        base_url: "-".to_string(),
    }
}
