use serde::{Deserialize, Serialize};

use super::defaults;

/// Trust aggregation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustConfig {
    /// Number of most recent events averaged by the recency strategy.
    pub recency_window: usize,
    /// Maximum length accepted for any identifier on a rating event.
    pub max_identifier_length: usize,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            recency_window: defaults::DEFAULT_RECENCY_WINDOW,
            max_identifier_length: defaults::DEFAULT_MAX_IDENTIFIER_LENGTH,
        }
    }
}
