use crate::schema::{Field, Schema};
use serde::{Deserialize, Serialize};

/// A pet record as stored and returned by every procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: i64,
    /// Species, e.g. `cat` or `dog`. Serialized as `type`.
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

impl Pet {
    pub fn new(id: i64, kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            name: name.into(),
        }
    }
}

/// Input of `petCreate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPet {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

/// Input of `petGet`.
///
/// The id is any JSON number: fractional or out-of-range ids validate and
/// then simply match no pet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PetIdInput {
    pub pet_id: f64,
}

impl PetIdInput {
    /// The id as a store key, if it is a whole number within `i64`.
    #[must_use]
    pub fn store_id(&self) -> Option<i64> {
        let id = self.pet_id;
        (id.fract() == 0.0 && id >= i64::MIN as f64 && id < i64::MAX as f64).then_some(id as i64)
    }
}

#[must_use]
pub fn pet_schema() -> Schema {
    Schema::object(vec![
        Field::required("id", Schema::Integer),
        Field::required("type", Schema::String),
        Field::required("name", Schema::String),
    ])
}

#[must_use]
pub fn new_pet_schema() -> Schema {
    pet_schema().pick(&["type", "name"])
}

#[must_use]
pub fn pet_id_schema() -> Schema {
    Schema::object(vec![Field::required("pet_id", Schema::Number)])
}
