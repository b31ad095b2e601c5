/// Source of fresh identifiers for profiles and list items.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}
