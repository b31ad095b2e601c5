use serde::{Deserialize, Serialize};

use super::defaults;

/// Historic snapshot log configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Whether list-item mutations record a historic snapshot.
    pub record_by_default: bool,
    /// Page size used when a caller asks for a page without a limit.
    pub default_page_limit: usize,
    /// Upper bound applied to any requested page size.
    pub max_page_limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            record_by_default: defaults::DEFAULT_RECORD_HISTORY,
            default_page_limit: defaults::DEFAULT_PAGE_LIMIT,
            max_page_limit: defaults::DEFAULT_MAX_PAGE_LIMIT,
        }
    }
}
