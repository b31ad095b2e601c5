//! File-backed engine: data survives reopen and reads go through the pool.

use persona_core::models::{FieldValue, HistoricQuery, ProfileDocument};
use persona_core::traits::{IHistoricStorage, IProfileStorage};
use persona_storage::pool::pragmas::verify_wal_mode;
use persona_storage::StorageEngine;

#[test]
fn profiles_and_history_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("persona.db");

    {
        let engine = StorageEngine::open(&path).unwrap();
        let mut profile = ProfileDocument::new("p1");
        profile.set_field("gender", FieldValue::text("F"));
        let stored = engine.insert(&profile).unwrap();
        engine.append("p1", 0, 1, &stored.profile).unwrap();
    }

    let engine = StorageEngine::open(&path).unwrap();
    let loaded = engine.get("p1").unwrap().unwrap();
    assert_eq!(loaded.profile.field("gender"), Some(&FieldValue::text("F")));
    assert_eq!(engine.query(&HistoricQuery::for_profile("p1")).unwrap().total, 1);
}

#[test]
fn file_backed_writer_uses_wal() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StorageEngine::open(&dir.path().join("wal.db")).unwrap();
    let wal = engine.pool().writer.with_conn_sync(verify_wal_mode).unwrap();
    assert!(wal);
    assert!(engine.pool().readers.size() >= 1);
}
