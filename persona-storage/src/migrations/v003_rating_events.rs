//! v003: rating_events.

use rusqlite::Connection;

use persona_core::errors::PersonaResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> PersonaResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS rating_events (
            seq           INTEGER PRIMARY KEY AUTOINCREMENT,
            source_id     TEXT NOT NULL,
            target_id     TEXT NOT NULL,
            relationship  TEXT,
            app_id        TEXT,
            community_id  TEXT,
            task_type_id  TEXT,
            task_id       TEXT,
            rating        REAL NOT NULL CHECK (rating >= 0.0 AND rating <= 1.0),
            report_time   INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_rating_source ON rating_events(source_id);
        CREATE INDEX IF NOT EXISTS idx_rating_target ON rating_events(target_id);
        CREATE INDEX IF NOT EXISTS idx_rating_report_time ON rating_events(report_time);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
