//! v002: historic_profiles, the append-only snapshot log.

use rusqlite::Connection;

use persona_core::errors::PersonaResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> PersonaResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS historic_profiles (
            seq         INTEGER PRIMARY KEY AUTOINCREMENT,
            profile_id  TEXT NOT NULL,
            from_ts     INTEGER NOT NULL,
            to_ts       INTEGER NOT NULL,
            snapshot    TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_historic_profile_from
            ON historic_profiles(profile_id, from_ts);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
