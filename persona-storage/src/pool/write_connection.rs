//! The one connection allowed to write. Every write takes its lock, so
//! writes are serialized.

use std::path::Path;

use rusqlite::Connection;
use tokio::sync::Mutex;

use persona_core::errors::PersonaResult;

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

/// Single writer connection guarded by a mutex.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    /// Open the writer for the database file at `path`.
    pub fn open(path: &Path, busy_timeout_ms: u64) -> PersonaResult<Self> {
        Self::configure(Connection::open(path), busy_timeout_ms)
    }

    /// Open a writer over a private in-memory database.
    pub fn open_in_memory(busy_timeout_ms: u64) -> PersonaResult<Self> {
        Self::configure(Connection::open_in_memory(), busy_timeout_ms)
    }

    fn configure(opened: rusqlite::Result<Connection>, busy_timeout_ms: u64) -> PersonaResult<Self> {
        let conn = opened.map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, busy_timeout_ms)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` under the write lock. Blocks the calling thread, so it must
    /// not be called from inside an async runtime.
    pub fn with_conn_sync<F, T>(&self, f: F) -> PersonaResult<T>
    where
        F: FnOnce(&Connection) -> PersonaResult<T>,
    {
        let conn = self.conn.blocking_lock();
        f(&conn)
    }
}
