use serde::{Deserialize, Serialize};

use super::defaults;

/// Profile mutation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Extra attempts made when the primary write loses a revision race.
    pub max_write_retries: u32,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            max_write_retries: defaults::DEFAULT_MAX_WRITE_RETRIES,
        }
    }
}
