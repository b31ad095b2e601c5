/// Trust aggregation errors.
#[derive(Debug, thiserror::Error)]
pub enum TrustError {
    #[error("no rating events match the query")]
    NoMatchingEvents,

    #[error("invalid aggregation strategy: '{name}'")]
    InvalidStrategy { name: String },
}
