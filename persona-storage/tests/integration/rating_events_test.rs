use std::sync::Arc;

use persona_core::models::{IdFilter, RatingEvent, RatingField, RatingQuery, TrustFilter};
use persona_core::traits::{IRatingStorage, ManualClock};
use persona_storage::StorageEngine;

fn seeded() -> (StorageEngine, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(100));
    let engine = StorageEngine::open_in_memory_with_clock(clock.clone()).unwrap();
    let events = [
        RatingEvent::new("alice", "bob", 0.2).in_app("app-1").for_task("ride", "t1"),
        RatingEvent::new("carol", "bob", 0.8).in_app("app-2").for_task("ride", "t2"),
        RatingEvent::new("alice", "bob", 0.6).in_app("app-1").in_community("c1"),
        RatingEvent::new("bob", "alice", 1.0).in_app("app-10"),
    ];
    for event in &events {
        engine.insert_rating(event).unwrap();
        clock.advance(10);
    }
    (engine, clock)
}

#[test]
fn insert_sets_report_time_from_clock() {
    let (engine, clock) = seeded();
    clock.set(9_999);
    let stored = engine
        .insert_rating(&RatingEvent::new("x", "y", 0.5).at(1))
        .unwrap();
    assert_eq!(stored.report_time, 9_999);
}

#[test]
fn exact_filters_are_conjunctive() {
    let (engine, _) = seeded();
    let filter = TrustFilter::for_target("bob").with(RatingField::AppId, IdFilter::exact("app-1"));
    let events = engine.find_ratings(&RatingQuery::new(filter.clone())).unwrap();
    let ratings: Vec<_> = events.iter().map(|e| e.rating).collect();
    assert_eq!(ratings, vec![0.2, 0.6]);
    assert_eq!(engine.count_ratings(&filter).unwrap(), 2);
}

#[test]
fn pattern_filter_matches_whole_value() {
    let (engine, _) = seeded();
    let filter = TrustFilter::new().with(
        RatingField::AppId,
        IdFilter::parse("appId", "/app-[0-9]/").unwrap(),
    );
    let events = engine.find_ratings(&RatingQuery::new(filter.clone())).unwrap();
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|e| e.app_id.as_deref() != Some("app-10")));
    assert_eq!(engine.count_ratings(&filter).unwrap(), 3);
}

#[test]
fn filter_on_missing_attribute_excludes_event() {
    let (engine, _) = seeded();
    let filter = TrustFilter::new().with(RatingField::CommunityId, IdFilter::exact("c1"));
    assert_eq!(engine.count_ratings(&filter).unwrap(), 1);
    let filter = TrustFilter::new().with(
        RatingField::TaskId,
        IdFilter::parse("taskId", "/.*/").unwrap(),
    );
    assert_eq!(engine.count_ratings(&filter).unwrap(), 2);
}

#[test]
fn report_window_bounds_are_inclusive() {
    let (engine, _) = seeded();
    let filter = TrustFilter::new().reported_between(Some(110), Some(120));
    assert_eq!(engine.count_ratings(&filter).unwrap(), 2);
}

#[test]
fn most_recent_first_with_limit() {
    let (engine, _) = seeded();
    let query = RatingQuery::new(TrustFilter::for_target("bob")).most_recent(2);
    let ratings: Vec<_> = engine
        .find_ratings(&query)
        .unwrap()
        .iter()
        .map(|e| e.rating)
        .collect();
    assert_eq!(ratings, vec![0.6, 0.8]);
}

#[test]
fn limit_applies_after_pattern_filtering() {
    let (engine, _) = seeded();
    let filter = TrustFilter::new().with(
        RatingField::SourceId,
        IdFilter::parse("sourceId", "/alice|carol/").unwrap(),
    );
    let events = engine
        .find_ratings(&RatingQuery::new(filter).most_recent(2))
        .unwrap();
    let ratings: Vec<_> = events.iter().map(|e| e.rating).collect();
    assert_eq!(ratings, vec![0.6, 0.8]);
}

#[test]
fn delete_referencing_removes_source_and_target_events() {
    let (engine, _) = seeded();
    assert_eq!(engine.delete_ratings_referencing("alice").unwrap(), 3);
    assert_eq!(engine.count_ratings(&TrustFilter::new()).unwrap(), 1);
}
