use persona_core::models::*;
use persona_core::traits::{Clock, ManualClock};
use proptest::prelude::*;

#[test]
fn profile_serializes_store_fields_alongside_content() {
    let mut profile = ProfileDocument::new("p-1");
    profile.creation_ts = 10;
    profile.last_update_ts = 20;
    profile.set_field("email", FieldValue::text("a@b.c"));

    let json = serde_json::to_value(&profile).unwrap();
    assert_eq!(json["id"], "p-1");
    assert_eq!(json["_creationTs"], 10);
    assert_eq!(json["_lastUpdateTs"], 20);
    assert_eq!(json["email"], "a@b.c");

    let back: ProfileDocument = serde_json::from_value(json).unwrap();
    assert_eq!(back, profile);
    assert!(!back.fields.contains_key("_creationTs"));
}

#[test]
fn content_equality_ignores_timestamps() {
    let mut a = ProfileDocument::new("p");
    a.set_field("locale", FieldValue::text("en"));
    let mut b = a.clone();
    b.last_update_ts = 99;
    assert!(a.content_equals(&b));
    b.set_field("locale", FieldValue::text("it"));
    assert!(!a.content_equals(&b));
}

#[test]
fn id_filter_slashes_mean_pattern() {
    let filter = IdFilter::parse("appId", "/app-[0-9]+/").unwrap();
    assert!(filter.is_pattern());
    assert!(filter.matches("app-12"));
    assert!(!filter.matches("xapp-12"));

    let exact = IdFilter::parse("appId", "app-1").unwrap();
    assert!(!exact.is_pattern());
    assert!(exact.matches("app-1"));
    assert!(!exact.matches("app-12"));
}

#[test]
fn id_filter_rejects_bad_pattern() {
    assert!(IdFilter::parse("taskId", "/([/").is_err());
}

#[test]
fn trust_filter_set_constraint_requires_attribute() {
    let event = RatingEvent::new("a", "b", 0.5).at(100);
    let filter = TrustFilter::for_target("b");
    assert!(filter.matches(&event));

    let with_app = filter.clone().with(RatingField::AppId, IdFilter::exact("x"));
    assert!(!with_app.matches(&event));
    assert!(with_app.matches(&event.clone().in_app("x")));
}

#[test]
fn trust_filter_report_window_is_inclusive() {
    let event = RatingEvent::new("a", "b", 0.5).at(100);
    assert!(TrustFilter::new()
        .reported_between(Some(100), Some(100))
        .matches(&event));
    assert!(!TrustFilter::new()
        .reported_between(Some(101), None)
        .matches(&event));
}

#[test]
fn strategy_names_parse_case_insensitively() {
    assert_eq!(
        "recency_based".parse::<TrustStrategy>().unwrap(),
        TrustStrategy::RecencyBased
    );
    assert_eq!("MEDIAN".parse::<TrustStrategy>().unwrap(), TrustStrategy::Median);
    assert!("MODE".parse::<TrustStrategy>().is_err());
}

#[test]
fn historic_query_defaults_to_open_bounds() {
    let query = HistoricQuery::for_profile("p");
    assert_eq!(query.bounds(), (0, i64::MAX));
    assert_eq!(query.order, SortOrder::Ascending);
    let query = query.from(5).to(10);
    assert_eq!(query.bounds(), (5, 10));
}

#[test]
fn sort_order_parses_aliases() {
    assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Descending);
    assert_eq!("+".parse::<SortOrder>().unwrap(), SortOrder::Ascending);
    assert!("sideways".parse::<SortOrder>().is_err());
}

#[test]
fn item_kind_discriminators() {
    assert_eq!(ItemKind::parse("car"), Some(ItemKind::Car));
    assert_eq!(ItemKind::parse("drivingLicense"), Some(ItemKind::DrivingLicense));
    assert_eq!(ItemKind::parse("boat"), None);
    assert_eq!(ItemKind::DrivingLicense.to_string(), "drivingLicense");
}

#[test]
fn manual_clock_advances() {
    let clock = ManualClock::new(1_000);
    assert_eq!(clock.advance(5), 1_005);
    assert_eq!(clock.now(), 1_005);
    clock.set(7);
    assert_eq!(clock.now(), 7);
}

proptest! {
    #[test]
    fn containment_matches_window_arithmetic(
        from in 0i64..1_000, len in 0i64..1_000, q_from in 0i64..2_000, q_to in 0i64..2_000
    ) {
        let snapshot = HistoricSnapshot { from, to: from + len, profile: ProfileDocument::new("p") };
        let query = HistoricQuery::for_profile("p").from(q_from).to(q_to);
        prop_assert_eq!(query.contains(&snapshot), from >= q_from && from + len <= q_to);
    }
}
