//! StorageEngine: owns the ConnectionPool and implements the profile,
//! historic and rating storage traits.

use std::path::Path;
use std::sync::Arc;

use persona_core::config::StorageConfig;
use persona_core::errors::PersonaResult;
use persona_core::models::{
    HistoricQuery, HistoricSnapshot, Page, ProfileDocument, RatingEvent, RatingQuery, Timestamp,
    TrustFilter, VersionedProfile,
};
use persona_core::traits::{
    Clock, IHistoricStorage, IProfileStorage, IRatingStorage, SystemClock, WriteOutcome,
};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{historic_ops, profile_crud, rating_ops};

/// SQLite-backed implementation of the profile, historic and rating stores.
pub struct StorageEngine {
    pool: ConnectionPool,
    /// File-backed databases read through the pool; in-memory ones read
    /// through the writer because pool connections are separate databases.
    use_read_pool: bool,
    clock: Arc<dyn Clock>,
}

impl StorageEngine {
    /// Open a file-backed engine with default settings.
    pub fn open(path: &Path) -> PersonaResult<Self> {
        let config = StorageConfig {
            db_path: path.display().to_string(),
            ..StorageConfig::default()
        };
        Self::open_with_config(&config, Arc::new(SystemClock))
    }

    /// Open the database named by `config` and run pending migrations.
    pub fn open_with_config(config: &StorageConfig, clock: Arc<dyn Clock>) -> PersonaResult<Self> {
        let pool = ConnectionPool::open(
            Path::new(&config.db_path),
            config.read_pool_size,
            config.busy_timeout_ms,
        )?;
        let engine = Self {
            pool,
            use_read_pool: true,
            clock,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// In-memory engine on the wall clock (for testing).
    pub fn open_in_memory() -> PersonaResult<Self> {
        Self::open_in_memory_with_clock(Arc::new(SystemClock))
    }

    /// In-memory engine stamping timestamps from `clock`.
    pub fn open_in_memory_with_clock(clock: Arc<dyn Clock>) -> PersonaResult<Self> {
        let pool = ConnectionPool::open_in_memory(StorageConfig::default().busy_timeout_ms)?;
        let engine = Self {
            pool,
            use_read_pool: false,
            clock,
        };
        engine.initialize()?;
        Ok(engine)
    }

    fn initialize(&self) -> PersonaResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            migrations::run_migrations(conn)?;
            Ok(())
        })
    }

    /// The underlying connections.
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Current schema version of the open database.
    pub fn schema_version(&self) -> PersonaResult<u32> {
        self.pool.writer.with_conn_sync(migrations::current_version)
    }

    fn now(&self) -> Timestamp {
        self.clock.now()
    }

    fn with_reader<F, T>(&self, f: F) -> PersonaResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> PersonaResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn_sync(f)
        }
    }
}

impl IProfileStorage for StorageEngine {
    fn insert(&self, profile: &ProfileDocument) -> PersonaResult<VersionedProfile> {
        let now = self.now();
        self.pool
            .writer
            .with_conn_sync(|conn| profile_crud::insert_profile(conn, profile, now))
    }

    fn get(&self, id: &str) -> PersonaResult<Option<VersionedProfile>> {
        self.with_reader(|conn| profile_crud::get_profile(conn, id))
    }

    fn replace(
        &self,
        profile: &ProfileDocument,
        expected_revision: i64,
    ) -> PersonaResult<WriteOutcome> {
        let now = self.now();
        self.pool.writer.with_conn_sync(|conn| {
            profile_crud::replace_profile(conn, profile, expected_revision, now)
        })
    }

    fn delete(&self, id: &str) -> PersonaResult<bool> {
        self.pool
            .writer
            .with_conn_sync(|conn| profile_crud::delete_profile(conn, id))
    }

    fn exists(&self, id: &str) -> PersonaResult<bool> {
        self.with_reader(|conn| profile_crud::profile_exists(conn, id))
    }

    fn count(&self) -> PersonaResult<usize> {
        self.with_reader(profile_crud::count_profiles)
    }
}

impl IHistoricStorage for StorageEngine {
    fn append(
        &self,
        profile_id: &str,
        from: Timestamp,
        to: Timestamp,
        profile: &ProfileDocument,
    ) -> PersonaResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| historic_ops::append_snapshot(conn, profile_id, from, to, profile))
    }

    fn query(&self, query: &HistoricQuery) -> PersonaResult<Page<HistoricSnapshot>> {
        self.with_reader(|conn| historic_ops::query_snapshots(conn, query))
    }

    fn delete_for_profile(&self, profile_id: &str) -> PersonaResult<usize> {
        self.pool
            .writer
            .with_conn_sync(|conn| historic_ops::delete_snapshots(conn, profile_id))
    }
}

impl IRatingStorage for StorageEngine {
    fn insert_rating(&self, event: &RatingEvent) -> PersonaResult<RatingEvent> {
        let mut stored = event.clone();
        stored.report_time = self.now();
        self.pool
            .writer
            .with_conn_sync(|conn| rating_ops::insert_rating(conn, &stored))?;
        Ok(stored)
    }

    fn find_ratings(&self, query: &RatingQuery) -> PersonaResult<Vec<RatingEvent>> {
        self.with_reader(|conn| rating_ops::find_ratings(conn, query))
    }

    fn count_ratings(&self, filter: &TrustFilter) -> PersonaResult<usize> {
        self.with_reader(|conn| rating_ops::count_ratings(conn, filter))
    }

    fn delete_ratings_referencing(&self, user_id: &str) -> PersonaResult<usize> {
        self.pool
            .writer
            .with_conn_sync(|conn| rating_ops::delete_ratings_referencing(conn, user_id))
    }
}
