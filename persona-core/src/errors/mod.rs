//! Error taxonomy for the Persona system.
//!
//! `PersonaError` is what callers see; the sub-enums group failures by the
//! layer that raises them and convert into it via `From`.

mod persona_error;
mod storage_error;
mod trust_error;
mod validation_error;

pub use persona_error::{PersonaError, PersonaResult};
pub use storage_error::StorageError;
pub use trust_error::TrustError;
pub use validation_error::ValidationError;
