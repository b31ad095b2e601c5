//! Default values for every configuration key.

// Storage
pub const DEFAULT_DB_PATH: &str = "persona.db";
pub const DEFAULT_READ_POOL_SIZE: usize = 4;
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

// History
pub const DEFAULT_RECORD_HISTORY: bool = true;
pub const DEFAULT_PAGE_LIMIT: usize = 10;
pub const DEFAULT_MAX_PAGE_LIMIT: usize = 1_000;

// Mutation
pub const DEFAULT_MAX_WRITE_RETRIES: u32 = 3;

// Trust
pub const DEFAULT_RECENCY_WINDOW: usize = crate::constants::RECENCY_WINDOW;
pub const DEFAULT_MAX_IDENTIFIER_LENGTH: usize = crate::constants::MAX_IDENTIFIER_LENGTH;

// Observability
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
