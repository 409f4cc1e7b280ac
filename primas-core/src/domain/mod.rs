//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod registro;
mod snapshot;
pub mod result;

pub use registro::{ConsecutivoPendiente, NegocioNuevo, Registro};
pub use snapshot::CacheSnapshot;
