//! # persona-core
//!
//! Foundation crate for the Persona profile system.
//! Defines the document model, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::PersonaConfig;
pub use errors::{PersonaError, PersonaResult};
pub use models::{Document, FieldValue, ProfileDocument, Timestamp};
