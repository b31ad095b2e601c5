/// Storage-layer errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("stored document for {id} is corrupt: {details}")]
    CorruptDocument { id: String, details: String },

    #[error("connection lock poisoned: {details}")]
    PoolLockPoisoned { details: String },
}
