//! In-memory people data-access layer.
//! CRUD over person documents, backed by a document-style key-value store.

pub mod logging;
pub mod model;
pub mod repo;
pub mod store;
pub mod utils;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::person::{
    Address, PersonCreate, PersonId, PersonRead, PersonUpdate, PersonValidationError, Timestamp,
};
pub use repo::person_repo::{PersonRepository, RepoError, RepoResult, StorePersonRepository};
pub use store::{
    Document, DocumentStore, MemoryStore, MutationGuard, OperationResult, StoreOptions, ID_FIELD,
};
pub use utils::{Clock, IdGenerator, SystemClock, UuidGenerator};

/// Minimal health-check API for smoke probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
