//! Identifier generation for newly created people.

use crate::model::person::PersonId;
use uuid::Uuid;

/// Produces a fresh, globally unique identifier on demand.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> PersonId;
}

/// Random UUID v4 identifiers in hyphenated text form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> PersonId {
        Uuid::new_v4().to_string()
    }
}
