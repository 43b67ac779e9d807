//! Repository layer over the person document store.
//!
//! # Responsibility
//! - Define the CRUD contract callers use for people.
//! - Isolate store result handling from callers.
//!
//! # Invariants
//! - Repository writes must enforce input `validate()` before persistence.
//! - Unacknowledged store mutations surface as semantic `NotFound` errors.

pub mod person_repo;
