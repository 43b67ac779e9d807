//! Injectable time and identifier providers.
//!
//! # Responsibility
//! - Isolate wall-clock and randomness from repository write paths.
//! - Let tests swap in deterministic implementations.

pub mod clock;
pub mod ids;

pub use clock::{Clock, SystemClock};
pub use ids::{IdGenerator, UuidGenerator};
