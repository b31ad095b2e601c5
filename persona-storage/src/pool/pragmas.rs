//! PRAGMAs applied to every connection.

use rusqlite::Connection;

use persona_core::errors::PersonaResult;

use crate::to_storage_err;

/// Writer-only settings. Journal mode belongs to the database file, so
/// setting it once from the writer covers the readers too.
const WRITER_PRAGMAS: &[(&str, &str)] = &[
    ("journal_mode", "WAL"),
    ("synchronous", "NORMAL"),
    ("foreign_keys", "ON"),
];

/// 64 MB page cache, expressed in KiB.
const CACHE_SIZE_KIB: i64 = -64_000;

/// Configure the writer: WAL journal, normal sync, cache and busy timeout.
pub fn apply_pragmas(conn: &Connection, busy_timeout_ms: u64) -> PersonaResult<()> {
    let mut batch: String = WRITER_PRAGMAS
        .iter()
        .map(|(name, value)| format!("PRAGMA {name} = {value};\n"))
        .collect();
    batch.push_str(&shared_pragmas(busy_timeout_ms));
    execute(conn, &batch)
}

/// Configure a reader: cache and busy timeout.
pub fn apply_read_pragmas(conn: &Connection, busy_timeout_ms: u64) -> PersonaResult<()> {
    execute(conn, &shared_pragmas(busy_timeout_ms))
}

fn shared_pragmas(busy_timeout_ms: u64) -> String {
    format!("PRAGMA cache_size = {CACHE_SIZE_KIB};\nPRAGMA busy_timeout = {busy_timeout_ms};\n")
}

fn execute(conn: &Connection, batch: &str) -> PersonaResult<()> {
    conn.execute_batch(batch)
        .map_err(|e| to_storage_err(e.to_string()))
}

/// True when the database file is in WAL mode.
pub fn verify_wal_mode(conn: &Connection) -> PersonaResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
