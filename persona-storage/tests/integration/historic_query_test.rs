use persona_core::models::{FieldValue, HistoricQuery, ProfileDocument, SortOrder};
use persona_core::traits::IHistoricStorage;
use persona_storage::StorageEngine;

fn snapshot(step: i64) -> ProfileDocument {
    let mut profile = ProfileDocument::new("p1");
    profile.creation_ts = 0;
    profile.last_update_ts = step * 10_000;
    profile.set_field("occupation", FieldValue::Integer(step));
    profile
}

/// Twenty contiguous snapshots: `[i * 10000, (i + 1) * 10000]`.
fn engine_with_twenty() -> StorageEngine {
    let engine = StorageEngine::open_in_memory().unwrap();
    for i in 0..20 {
        engine
            .append("p1", i * 10_000, (i + 1) * 10_000, &snapshot(i))
            .unwrap();
    }
    engine
}

#[test]
fn unbounded_query_returns_everything() {
    let engine = engine_with_twenty();
    let page = engine
        .query(&HistoricQuery::for_profile("p1").page(0, 20))
        .unwrap();
    assert_eq!(page.total, 20);
    assert_eq!(page.items.len(), 20);
    assert_eq!(page.items[0].from, 0);
    assert_eq!(page.items[19].to, 200_000);
    assert_eq!(page.items[3].profile, snapshot(3));
}

#[test]
fn offset_past_total_yields_empty_items_with_total() {
    let engine = engine_with_twenty();
    for offset in [20, 21, 500] {
        let page = engine
            .query(&HistoricQuery::for_profile("p1").page(offset, 10))
            .unwrap();
        assert_eq!(page.total, 20);
        assert_eq!(page.offset, offset);
        assert!(page.items.is_empty());
    }
}

#[test]
fn lower_bound_keeps_the_last_thirteen() {
    let engine = engine_with_twenty();
    let page = engine
        .query(&HistoricQuery::for_profile("p1").from(70_000).page(0, 100))
        .unwrap();
    assert_eq!(page.total, 13);
    assert_eq!(page.items.len(), 13);
    assert_eq!(page.items[0].from, 70_000);
}

#[test]
fn upper_bound_keeps_the_first_seven() {
    let engine = engine_with_twenty();
    let page = engine
        .query(&HistoricQuery::for_profile("p1").from(0).to(70_000).page(0, 100))
        .unwrap();
    assert_eq!(page.total, 7);
    assert_eq!(page.items.last().unwrap().to, 70_000);
}

#[test]
fn descending_order_sorts_by_from_decreasing() {
    let engine = engine_with_twenty();
    let page = engine
        .query(
            &HistoricQuery::for_profile("p1")
                .order(SortOrder::Descending)
                .page(0, 3),
        )
        .unwrap();
    let froms: Vec<_> = page.items.iter().map(|s| s.from).collect();
    assert_eq!(froms, vec![190_000, 180_000, 170_000]);
}

#[test]
fn pagination_counts_offset_in_sorted_order() {
    let engine = engine_with_twenty();
    let page = engine
        .query(&HistoricQuery::for_profile("p1").page(5, 2))
        .unwrap();
    let froms: Vec<_> = page.items.iter().map(|s| s.from).collect();
    assert_eq!(froms, vec![50_000, 60_000]);
    assert_eq!(page.total, 20);
}

#[test]
fn unknown_profile_yields_empty_page() {
    let engine = engine_with_twenty();
    let page = engine.query(&HistoricQuery::for_profile("p2")).unwrap();
    assert_eq!(page.total, 0);
    assert!(page.items.is_empty());
}

#[test]
fn duplicate_windows_are_accepted() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine.append("p1", 1, 2, &snapshot(0)).unwrap();
    engine.append("p1", 1, 2, &snapshot(1)).unwrap();
    let page = engine.query(&HistoricQuery::for_profile("p1")).unwrap();
    assert_eq!(page.total, 2);
    // Equal `from` values keep insertion order.
    assert_eq!(page.items[0].profile, snapshot(0));
}

#[test]
fn delete_for_profile_removes_only_that_history() {
    let engine = engine_with_twenty();
    engine.append("p2", 0, 1, &snapshot(0)).unwrap();
    assert_eq!(engine.delete_for_profile("p1").unwrap(), 20);
    assert_eq!(engine.query(&HistoricQuery::for_profile("p1")).unwrap().total, 0);
    assert_eq!(engine.query(&HistoricQuery::for_profile("p2")).unwrap().total, 1);
}
