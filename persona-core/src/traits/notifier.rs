use crate::errors::PersonaResult;

/// Receives a message after every successful profile write.
pub trait IChangeNotifier: Send + Sync {
    fn notify(&self, profile_id: &str, changed_fields: &[String]) -> PersonaResult<()>;
}
