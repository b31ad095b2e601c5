//! Versioned schema migrations.
//!
//! Applied versions are recorded in `schema_version`. Each pending migration
//! runs in its own transaction together with its version row.

mod v001_profiles;
mod v002_historic_profiles;
mod v003_rating_events;

use rusqlite::{params, Connection};
use tracing::info;

use persona_core::errors::{PersonaResult, StorageError};

use crate::to_storage_err;

type MigrationFn = fn(&Connection) -> PersonaResult<()>;

const MIGRATIONS: &[(u32, &str, MigrationFn)] = &[
    (1, "profiles", v001_profiles::migrate),
    (2, "historic_profiles", v002_historic_profiles::migrate),
    (3, "rating_events", v003_rating_events::migrate),
];

/// Latest schema version known to this build.
pub const LATEST_VERSION: u32 = 3;

/// Apply every migration newer than the recorded schema version.
/// Returns the number of migrations applied.
pub fn run_migrations(conn: &Connection) -> PersonaResult<usize> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version     INTEGER PRIMARY KEY,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let current = current_version(conn)?;
    let mut applied = 0;
    for &(version, name, migrate) in MIGRATIONS.iter().filter(|(v, _, _)| *v > current) {
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| to_storage_err(format!("migration v{version:03} begin: {e}")))?;
        migrate(&tx).map_err(|e| StorageError::MigrationFailed {
            version,
            reason: e.to_string(),
        })?;
        tx.execute(
            "INSERT INTO schema_version (version, name) VALUES (?1, ?2)",
            params![version, name],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
        tx.commit()
            .map_err(|e| to_storage_err(format!("migration v{version:03} commit: {e}")))?;
        info!(version, migration = name, "applied schema migration");
        applied += 1;
    }
    Ok(applied)
}

/// Highest applied schema version, 0 for a fresh database.
pub fn current_version(conn: &Connection) -> PersonaResult<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
