use super::model::{NewPet, Pet};
use parking_lot::RwLock;
use rand::Rng;
use tracing::debug;

/// Upper bound (inclusive) for generated pet ids.
pub const MAX_PET_ID: i64 = 10_000_000;

/// In-memory pet collection shared by all invocations of one process.
///
/// Starts with five seeded pets. Appends take the write lock for the whole
/// read-modify-write so two concurrent creates cannot lose an entry. Nothing
/// is persisted; a cold start sees only the seed again.
#[derive(Debug, Default)]
pub struct PetStore {
    pets: RwLock<Vec<Pet>>,
}

impl PetStore {
    #[must_use]
    pub fn new(pets: Vec<Pet>) -> Self {
        Self {
            pets: RwLock::new(pets),
        }
    }

    /// Store holding the seed collection, ids 1 through 5.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(seed_pets())
    }

    /// Snapshot of every pet in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<Pet> {
        self.pets.read().clone()
    }

    /// First pet with `id`, if any.
    #[must_use]
    pub fn get(&self, id: i64) -> Option<Pet> {
        self.pets.read().iter().find(|p| p.id == id).cloned()
    }

    /// Append a pet with a random id in `1..=MAX_PET_ID` and return it.
    ///
    /// Ids are not checked for uniqueness; lookups return the first match.
    pub fn add(&self, new_pet: NewPet) -> Pet {
        let id = rand::thread_rng().gen_range(1..=MAX_PET_ID);
        let pet = Pet {
            id,
            kind: new_pet.kind,
            name: new_pet.name,
        };
        let mut pets = self.pets.write();
        pets.push(pet.clone());
        debug!(pet_id = id, total = pets.len(), "Pet added");
        pet
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pets.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pets.read().is_empty()
    }
}

/// The initial collection.
#[must_use]
pub fn seed_pets() -> Vec<Pet> {
    vec![
        Pet::new(1, "cat", "Molly"),
        Pet::new(2, "dog", "Shadow"),
        Pet::new(3, "dog", "Ava"),
        Pet::new(4, "cat", "Toothless"),
        Pet::new(5, "cat", "Sunshine"),
    ]
}
