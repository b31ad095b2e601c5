//! v001: profiles.

use rusqlite::Connection;

use persona_core::errors::PersonaResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> PersonaResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS profiles (
            id              TEXT PRIMARY KEY,
            document        TEXT NOT NULL,
            creation_ts     INTEGER NOT NULL,
            last_update_ts  INTEGER NOT NULL,
            revision        INTEGER NOT NULL DEFAULT 1,
            CHECK (last_update_ts >= creation_ts)
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
