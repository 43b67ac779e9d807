//! Document store contract and in-memory implementation.
//!
//! # Responsibility
//! - Hold person documents keyed by their `_id` field.
//! - Report the outcome of every mutation as an `OperationResult`.
//!
//! # Invariants
//! - Every stored document has a string `_id` equal to its key.
//! - The store performs no schema validation; that belongs to `model`.
//! - `_id` is never rewritten by `update_one`.

mod memory;

pub use memory::MemoryStore;

use serde_json::{Map, Value};

/// One stored record: field name to JSON value.
pub type Document = Map<String, Value>;

/// Identifier field present on every stored document.
pub const ID_FIELD: &str = "_id";
/// Creation timestamp field stamped by the repository.
pub const CREATED_FIELD: &str = "created";
/// Last-write timestamp field stamped by the repository.
pub const UPDATED_FIELD: &str = "updated";

/// Outcome of a single store mutation.
///
/// `inserted_id` carries the inserted id for `insert_one` and the affected
/// id for `update_one`/`delete_one`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationResult {
    pub acknowledged: bool,
    pub inserted_id: Option<String>,
    pub modified_count: u64,
    pub deleted_count: u64,
}

impl OperationResult {
    /// Result of a mutation that did not apply.
    pub fn unacknowledged() -> Self {
        Self::default()
    }

    pub(crate) fn inserted(id: &str) -> Self {
        Self {
            acknowledged: true,
            inserted_id: Some(id.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn modified(id: &str) -> Self {
        Self {
            acknowledged: true,
            inserted_id: Some(id.to_string()),
            modified_count: 1,
            ..Self::default()
        }
    }

    pub(crate) fn deleted(id: &str) -> Self {
        Self {
            acknowledged: true,
            inserted_id: Some(id.to_string()),
            deleted_count: 1,
            ..Self::default()
        }
    }
}

/// Precondition checked by `update_one` and `delete_one` before acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationGuard {
    /// Act only when the id is stored.
    #[default]
    RequirePresent,
    /// Legacy inverted check: pass only when the id is NOT stored.
    ///
    /// The guarded branch then targets a record that does not exist, so it
    /// is a logged no-op. Update and delete never succeed in this mode.
    RequireAbsent,
}

impl MutationGuard {
    pub(crate) fn allows(self, id_present: bool) -> bool {
        match self {
            Self::RequirePresent => id_present,
            Self::RequireAbsent => !id_present,
        }
    }
}

/// Construction options for `MemoryStore`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    pub mutation_guard: MutationGuard,
}

/// Document-collection interface consumed by the repository.
pub trait DocumentStore {
    /// Returns a copy of the document stored under `id`.
    fn find_one(&self, id: &str) -> Option<Document>;
    /// Returns copies of every stored document in store order.
    fn find_all(&self) -> Vec<Document>;
    /// Inserts `document` under its `_id` unless that id is already stored.
    fn insert_one(&self, document: Document) -> OperationResult;
    /// Merges `fields` into the document stored under `id` (`$set`).
    fn update_one(&self, id: &str, fields: Document) -> OperationResult;
    /// Removes the document stored under `id`.
    fn delete_one(&self, id: &str) -> OperationResult;
    /// Removes every document.
    fn delete_all(&self);
}
