//! Round-robin pool of read connections. Under WAL, readers never block on
//! the writer.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags};

use persona_core::errors::{PersonaResult, StorageError};

use super::pragmas::apply_read_pragmas;
use crate::to_storage_err;

const MAX_POOL_SIZE: usize = 8;

/// Read-only connections handed out in turn.
pub struct ReadPool {
    connections: Vec<Mutex<Connection>>,
    next: AtomicUsize,
}

impl ReadPool {
    /// Open `pool_size` (clamped to 1..=8) read-only connections to `path`.
    pub fn open(path: &Path, pool_size: usize, busy_timeout_ms: u64) -> PersonaResult<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        Self::build(pool_size, busy_timeout_ms, || {
            Connection::open_with_flags(path, flags)
        })
    }

    /// Each in-memory connection is its own empty database; callers route
    /// reads elsewhere in that mode.
    pub fn open_in_memory(pool_size: usize, busy_timeout_ms: u64) -> PersonaResult<Self> {
        Self::build(pool_size, busy_timeout_ms, Connection::open_in_memory)
    }

    fn build(
        pool_size: usize,
        busy_timeout_ms: u64,
        open: impl Fn() -> rusqlite::Result<Connection>,
    ) -> PersonaResult<Self> {
        let connections = (0..pool_size.clamp(1, MAX_POOL_SIZE))
            .map(|_| -> PersonaResult<Mutex<Connection>> {
                let conn = open().map_err(|e| to_storage_err(e.to_string()))?;
                apply_read_pragmas(&conn, busy_timeout_ms)?;
                Ok(Mutex::new(conn))
            })
            .collect::<PersonaResult<Vec<_>>>()?;
        Ok(Self {
            connections,
            next: AtomicUsize::new(0),
        })
    }

    /// Run `f` on the next connection in turn.
    pub fn with_conn<F, T>(&self, f: F) -> PersonaResult<T>
    where
        F: FnOnce(&Connection) -> PersonaResult<T>,
    {
        let slot = self.next.fetch_add(1, Ordering::Relaxed) % self.connections.len();
        let conn = self.connections[slot]
            .lock()
            .map_err(|e| StorageError::PoolLockPoisoned {
                details: format!("reader {slot}: {e}"),
            })?;
        f(&conn)
    }

    /// Number of connections in the pool.
    pub fn size(&self) -> usize {
        self.connections.len()
    }
}
