//! # persona-storage
//!
//! SQLite persistence for the three Persona stores: current profile
//! documents, the append-only historic snapshot log, and rating events.
//! One serialized writer, a round-robin read pool, versioned migrations.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use persona_core::errors::{PersonaError, StorageError};

/// Wrap a SQLite failure message as a storage error.
pub(crate) fn to_storage_err(message: String) -> PersonaError {
    PersonaError::StorageError(StorageError::SqliteError { message })
}
