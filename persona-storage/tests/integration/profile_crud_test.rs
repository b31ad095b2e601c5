use std::sync::Arc;

use persona_core::errors::{PersonaError, ValidationError};
use persona_core::models::{FieldValue, ProfileDocument};
use persona_core::traits::{IProfileStorage, ManualClock, WriteOutcome};
use persona_storage::StorageEngine;

fn engine_at(start: i64) -> (StorageEngine, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start));
    let engine = StorageEngine::open_in_memory_with_clock(clock.clone()).unwrap();
    (engine, clock)
}

fn make_profile(id: &str) -> ProfileDocument {
    let mut profile = ProfileDocument::new(id);
    profile.set_field("email", FieldValue::text(format!("{id}@example.org")));
    profile
}

#[test]
fn insert_stamps_timestamps_ignoring_caller_values() {
    let (engine, _) = engine_at(1_000);
    let mut profile = make_profile("p1");
    profile.creation_ts = 5;
    profile.last_update_ts = 7;

    let stored = engine.insert(&profile).unwrap();
    assert_eq!(stored.revision, 1);
    assert_eq!(stored.profile.creation_ts, 1_000);
    assert_eq!(stored.profile.last_update_ts, 1_000);

    let loaded = engine.get("p1").unwrap().unwrap();
    assert_eq!(loaded, stored);
}

#[test]
fn insert_duplicate_id_is_rejected() {
    let (engine, _) = engine_at(1_000);
    engine.insert(&make_profile("p1")).unwrap();
    let err = engine.insert(&make_profile("p1")).unwrap_err();
    assert!(matches!(
        err,
        PersonaError::ValidationError(ValidationError::DuplicateIdentifier { .. })
    ));
}

#[test]
fn get_missing_profile_is_none() {
    let (engine, _) = engine_at(0);
    assert!(engine.get("nobody").unwrap().is_none());
    assert!(!engine.exists("nobody").unwrap());
}

#[test]
fn replace_advances_update_timestamp_and_revision() {
    let (engine, clock) = engine_at(1_000);
    let stored = engine.insert(&make_profile("p1")).unwrap();

    clock.set(2_000);
    let mut changed = stored.profile.clone();
    changed.set_field("locale", FieldValue::text("it_IT"));
    let outcome = engine.replace(&changed, stored.revision).unwrap();

    let updated = match outcome {
        WriteOutcome::Applied(updated) => updated,
        other => panic!("expected applied write, got {other:?}"),
    };
    assert_eq!(updated.revision, 2);
    assert_eq!(updated.profile.creation_ts, 1_000);
    assert_eq!(updated.profile.last_update_ts, 2_000);
    assert_eq!(engine.get("p1").unwrap().unwrap(), updated);
}

#[test]
fn replace_never_moves_update_timestamp_backwards() {
    let (engine, clock) = engine_at(5_000);
    let stored = engine.insert(&make_profile("p1")).unwrap();

    clock.set(10);
    let WriteOutcome::Applied(updated) = engine.replace(&stored.profile, 1).unwrap() else {
        panic!("expected applied write");
    };
    assert_eq!(updated.profile.last_update_ts, 5_000);
    assert!(updated.profile.last_update_ts >= updated.profile.creation_ts);
}

#[test]
fn replace_with_old_revision_is_stale() {
    let (engine, _) = engine_at(1_000);
    let stored = engine.insert(&make_profile("p1")).unwrap();
    assert!(matches!(
        engine.replace(&stored.profile, 1).unwrap(),
        WriteOutcome::Applied(_)
    ));
    assert_eq!(engine.replace(&stored.profile, 1).unwrap(), WriteOutcome::Stale);
}

#[test]
fn replace_missing_profile_reports_missing() {
    let (engine, _) = engine_at(1_000);
    assert_eq!(
        engine.replace(&make_profile("ghost"), 1).unwrap(),
        WriteOutcome::Missing
    );
}

#[test]
fn delete_and_count() {
    let (engine, _) = engine_at(1_000);
    engine.insert(&make_profile("a")).unwrap();
    engine.insert(&make_profile("b")).unwrap();
    assert_eq!(engine.count().unwrap(), 2);

    assert!(engine.delete("a").unwrap());
    assert!(!engine.delete("a").unwrap());
    assert_eq!(engine.count().unwrap(), 1);
}
