/// Caller-input errors raised while decoding, merging, or storing documents.
///
/// `field` is a path such as `materials[2].carPlate`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("duplicate identifier '{id}' in {field}")]
    DuplicateIdentifier { field: String, id: String },

    #[error("{field}: expected {expected}, found {found}")]
    ShapeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    #[error("unknown field '{field}'")]
    UnknownField { field: String },

    #[error("{field}: unknown item type '{variant}'")]
    UnknownVariant { field: String, variant: String },

    #[error("{field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("profile {id} is already equal to the submitted document")]
    UnchangedUpdate { id: String },
}
