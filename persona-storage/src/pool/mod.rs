//! Connection pool managing read/write connections.

pub mod pragmas;
pub mod read_pool;
pub mod write_connection;

use std::path::{Path, PathBuf};

use persona_core::errors::PersonaResult;

pub use read_pool::ReadPool;
pub use write_connection::WriteConnection;

/// The single write connection plus the read connection pool.
pub struct ConnectionPool {
    pub writer: WriteConnection,
    pub readers: ReadPool,
    pub db_path: Option<PathBuf>,
}

impl ConnectionPool {
    /// Open the writer and `read_pool_size` readers on `path`.
    pub fn open(path: &Path, read_pool_size: usize, busy_timeout_ms: u64) -> PersonaResult<Self> {
        let writer = WriteConnection::open(path, busy_timeout_ms)?;
        let readers = ReadPool::open(path, read_pool_size, busy_timeout_ms)?;
        Ok(Self {
            writer,
            readers,
            db_path: Some(path.to_path_buf()),
        })
    }

    /// In-memory databases are private to their connection, so readers of an
    /// in-memory pool do not see the writer's data. Route reads through the
    /// writer in that mode.
    pub fn open_in_memory(busy_timeout_ms: u64) -> PersonaResult<Self> {
        let writer = WriteConnection::open_in_memory(busy_timeout_ms)?;
        let readers = ReadPool::open_in_memory(1, busy_timeout_ms)?;
        Ok(Self {
            writer,
            readers,
            db_path: None,
        })
    }
}
