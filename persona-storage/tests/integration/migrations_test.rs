use persona_storage::migrations::{self, LATEST_VERSION};
use persona_storage::StorageEngine;

#[test]
fn fresh_database_is_at_latest_version() {
    let engine = StorageEngine::open_in_memory().unwrap();
    assert_eq!(engine.schema_version().unwrap(), LATEST_VERSION);
}

#[test]
fn migrations_are_idempotent() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let applied = engine
        .pool()
        .writer
        .with_conn_sync(migrations::run_migrations)
        .unwrap();
    assert_eq!(applied, 0);
}

#[test]
fn out_of_range_rating_is_rejected_by_schema() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let result = engine.pool().writer.with_conn_sync(|conn| {
        persona_storage::queries::rating_ops::insert_rating(
            conn,
            &persona_core::models::RatingEvent::new("a", "b", 1.5),
        )
    });
    assert!(result.unwrap_err().is_store_unavailable());
}
