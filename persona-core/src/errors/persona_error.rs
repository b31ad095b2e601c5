use super::{StorageError, TrustError, ValidationError};

/// Top-level error for every Persona operation.
#[derive(Debug, thiserror::Error)]
pub enum PersonaError {
    #[error("profile not found: {id}")]
    ProfileNotFound { id: String },

    #[error("no item {key} in list field '{field}'")]
    ItemNotFound { field: String, key: String },

    #[error("validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("trust aggregation failed: {0}")]
    TrustError(#[from] TrustError),

    #[error("storage unavailable: {0}")]
    StorageError(#[from] StorageError),

    #[error("profile {id} was modified concurrently; gave up after {attempts} attempts")]
    ConcurrentModification { id: String, attempts: u32 },

    #[error("change notification failed: {reason}")]
    NotificationFailed { reason: String },

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl PersonaError {
    /// True when the underlying store could not serve the request.
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::StorageError(_))
    }

    /// True for caller mistakes: bad patch shapes, duplicate identifiers,
    /// no-op replacements.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    /// True when a referenced profile or list item does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ProfileNotFound { .. } | Self::ItemNotFound { .. })
    }
}

/// Convenience alias used throughout the workspace.
pub type PersonaResult<T> = Result<T, PersonaError>;
