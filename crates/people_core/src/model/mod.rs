//! Person data contract.
//!
//! # Responsibility
//! - Define the typed create/update/read shapes exchanged with callers.
//! - Validate input fields before anything reaches the store.
//!
//! # Invariants
//! - Every persisted person is identified by a stable `PersonId`.
//! - Read shapes always carry `created` and `updated` timestamps.

pub mod person;
