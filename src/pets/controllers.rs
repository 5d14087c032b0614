use super::model::{NewPet, Pet, PetIdInput};
use super::store::PetStore;
use crate::error::ProcedureError;
use crate::typed::{Handler, NoInput, RequestContext};
use std::sync::Arc;
use tracing::info;

/// `petGetAll`: every pet in insertion order.
pub struct ListPetsController {
    store: Arc<PetStore>,
}

impl ListPetsController {
    pub fn new(store: Arc<PetStore>) -> Self {
        Self { store }
    }
}

impl Handler for ListPetsController {
    type Input = NoInput;
    type Output = Vec<Pet>;

    fn handle(&self, _input: NoInput, _ctx: &RequestContext) -> Result<Vec<Pet>, ProcedureError> {
        Ok(self.store.list())
    }
}

/// `petCreate`: append a pet and return the whole collection.
pub struct CreatePetController {
    store: Arc<PetStore>,
}

impl CreatePetController {
    pub fn new(store: Arc<PetStore>) -> Self {
        Self { store }
    }
}

impl Handler for CreatePetController {
    type Input = NewPet;
    type Output = Vec<Pet>;

    fn handle(&self, input: NewPet, ctx: &RequestContext) -> Result<Vec<Pet>, ProcedureError> {
        let pet = self.store.add(input);
        info!(
            request_id = %ctx.request_id,
            ip = %ctx.ip,
            pet_id = pet.id,
            pet_type = %pet.kind,
            "Pet created"
        );
        Ok(self.store.list())
    }
}

/// `petGet`: one pet by id, `NOT_FOUND` when absent.
pub struct GetPetController {
    store: Arc<PetStore>,
}

impl GetPetController {
    pub fn new(store: Arc<PetStore>) -> Self {
        Self { store }
    }
}

impl Handler for GetPetController {
    type Input = PetIdInput;
    type Output = Pet;

    fn handle(&self, input: PetIdInput, _ctx: &RequestContext) -> Result<Pet, ProcedureError> {
        input
            .store_id()
            .and_then(|id| self.store.get(id))
            .ok_or_else(|| ProcedureError::not_found("Pet not found"))
    }
}
