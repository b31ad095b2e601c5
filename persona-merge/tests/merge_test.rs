use std::sync::Arc;

use persona_core::errors::{PersonaError, ValidationError};
use persona_core::models::{Document, FieldValue, ItemKind, ProfileDocument};
use persona_merge::*;
use serde::Deserialize;

#[derive(Deserialize)]
struct MergeCase {
    description: String,
    current: ProfileDocument,
    patch: serde_json::Value,
    expected: Document,
    changed_fields: Vec<String>,
}

fn engine() -> MergeEngine {
    MergeEngine::new(Arc::new(SequentialIdGenerator::new("gen-")))
}

fn profile(json: serde_json::Value) -> ProfileDocument {
    serde_json::from_value(json).unwrap()
}

#[test]
fn golden_merge_cases() {
    let cases: Vec<(String, MergeCase)> = test_fixtures::load_all("golden/merge");
    assert!(!cases.is_empty());
    let schema = ProfileSchema::default();

    for (file, case) in cases {
        let patch = schema.decode(&case.patch).unwrap();
        let outcome = engine().merge(&case.current, &patch).unwrap();
        assert_eq!(
            outcome.profile.fields, case.expected,
            "{file}: {}",
            case.description
        );
        assert_eq!(
            outcome.changed_field_list(),
            case.changed_fields,
            "{file}: {}",
            case.description
        );
        assert_eq!(outcome.profile.id, case.current.id);
        assert_eq!(outcome.profile.creation_ts, case.current.creation_ts);
    }
}

#[test]
fn empty_patch_is_identity() {
    let current = profile(serde_json::json!({
        "id": "p", "_creationTs": 1, "_lastUpdateTs": 2,
        "email": "a@b.c", "norms": [{"id": "n1", "attribute": "x"}]
    }));
    let outcome = engine().merge(&current, &PartialDocument::new()).unwrap();
    assert_eq!(outcome.profile, current);
    assert!(outcome.is_unchanged());
}

#[test]
fn store_managed_fields_in_patch_are_ignored() {
    let current = ProfileDocument::new("p");
    let patch = PatchBuilder::new()
        .set("id", "other")
        .set("_creationTs", 99i64)
        .build();
    let outcome = engine().merge(&current, &patch).unwrap();
    assert_eq!(outcome.profile.id, "p");
    assert!(outcome.profile.fields.is_empty());
}

#[test]
fn absent_patch_entries_keep_values() {
    let current = profile(serde_json::json!({"id": "p", "email": "a@b.c"}));
    let patch = PatchBuilder::new().patch("email", FieldPatch::Absent).build();
    let outcome = engine().merge(&current, &patch).unwrap();
    assert_eq!(outcome.profile.field("email"), Some(&FieldValue::text("a@b.c")));
    assert!(outcome.is_unchanged());
}

#[test]
fn same_existing_id_twice_is_a_duplicate() {
    let current = profile(serde_json::json!({
        "id": "p", "norms": [{"id": "n1", "attribute": "x"}]
    }));
    let patch = PatchBuilder::new()
        .identified(
            "norms",
            vec![
                IdentifiedItemPatch::with_id("n1").field("attribute", "y"),
                IdentifiedItemPatch::with_id("n1").field("attribute", "z"),
            ],
        )
        .build();
    let err = engine().merge(&current, &patch).unwrap_err();
    assert!(matches!(
        err,
        PersonaError::ValidationError(ValidationError::DuplicateIdentifier { ref id, .. }) if id == "n1"
    ));
}

#[test]
fn generated_id_colliding_with_existing_item_is_drawn_again() {
    let current = profile(serde_json::json!({
        "id": "p", "norms": [{"id": "gen-1", "attribute": "x"}]
    }));
    let patch = PatchBuilder::new()
        .identified(
            "norms",
            vec![
                IdentifiedItemPatch::with_id("gen-1"),
                IdentifiedItemPatch::new().field("attribute", "b"),
            ],
        )
        .build();
    let outcome = engine().merge(&current, &patch).unwrap();
    let norms = outcome.profile.field("norms").and_then(FieldValue::as_list).unwrap();
    let ids: Vec<&str> = norms
        .iter()
        .map(|item| item.as_object().unwrap()["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["gen-1", "gen-2"]);
    assert_eq!(
        norms[1].as_object().unwrap()["attribute"],
        FieldValue::text("b")
    );
}

struct ConstantIds;

impl persona_core::traits::IdGenerator for ConstantIds {
    fn next_id(&self) -> String {
        "same".to_string()
    }
}

#[test]
fn generator_stuck_on_a_taken_id_gives_up() {
    let current = profile(serde_json::json!({
        "id": "p", "norms": [{"id": "same", "attribute": "x"}]
    }));
    let patch = PatchBuilder::new()
        .identified("norms", vec![IdentifiedItemPatch::new().field("attribute", "y")])
        .build();
    let err = MergeEngine::new(Arc::new(ConstantIds))
        .merge(&current, &patch)
        .unwrap_err();
    assert!(matches!(
        err,
        PersonaError::ValidationError(ValidationError::DuplicateIdentifier { ref id, .. }) if id == "same"
    ));
}

#[test]
fn items_without_ids_match_by_position() {
    let current = profile(serde_json::json!({
        "id": "p",
        "norms": [
            {"attribute": "age", "operator": "GREATER_THAN"},
            {"id": "n2", "attribute": "gender"}
        ]
    }));
    let patch = PatchBuilder::new()
        .identified(
            "norms",
            vec![
                IdentifiedItemPatch::new().field("operator", "LESS_THAN"),
                IdentifiedItemPatch::with_id("n2"),
            ],
        )
        .build();
    let outcome = engine().merge(&current, &patch).unwrap();
    let norms = outcome.profile.field("norms").and_then(FieldValue::as_list).unwrap();
    let first = norms[0].as_object().unwrap();
    assert_eq!(first["id"], FieldValue::text("gen-1"));
    assert_eq!(first["attribute"], FieldValue::text("age"));
    assert_eq!(first["operator"], FieldValue::text("LESS_THAN"));
    assert_eq!(norms[1].as_object().unwrap()["attribute"], FieldValue::text("gender"));
}

#[test]
fn item_without_id_over_identified_item_is_new() {
    let current = profile(serde_json::json!({
        "id": "p", "norms": [{"id": "n1", "attribute": "age"}]
    }));
    let patch = PatchBuilder::new()
        .identified("norms", vec![IdentifiedItemPatch::new().field("operator", "EQUALS")])
        .build();
    let outcome = engine().merge(&current, &patch).unwrap();
    assert_eq!(
        outcome.profile.field("norms"),
        Some(&FieldValue::List(vec![FieldValue::Object(
            [
                ("id".to_string(), FieldValue::text("gen-1")),
                ("operator".to_string(), FieldValue::text("EQUALS")),
            ]
            .into_iter()
            .collect()
        )]))
    );
}

#[test]
fn relationships_are_replaced_wholesale() {
    let current = profile(serde_json::json!({
        "id": "p",
        "relationships": [
            {"userId": "a", "type": "friend", "weight": 0.9},
            {"userId": "b", "type": "colleague"}
        ]
    }));
    let patch = ProfileSchema::default()
        .decode(&serde_json::json!({"relationships": [{"userId": "x"}]}))
        .unwrap();
    let outcome = engine().merge(&current, &patch).unwrap();
    assert_eq!(
        serde_json::to_value(&outcome.profile).unwrap()["relationships"],
        serde_json::json!([{"userId": "x"}])
    );
    assert_eq!(outcome.changed_field_list(), vec!["relationships"]);
}

#[test]
fn object_patch_over_scalar_is_a_shape_mismatch() {
    let current = profile(serde_json::json!({
        "id": "p", "materials": [{"id": "m1", "carPlate": "AB"}]
    }));
    let patch = PatchBuilder::new()
        .identified(
            "materials",
            vec![IdentifiedItemPatch::with_id("m1")
                .field("carPlate", FieldPatch::Object(PatchBuilder::new().set("x", 1i64).build()))],
        )
        .build();
    let err = engine().merge(&current, &patch).unwrap_err();
    match err {
        PersonaError::ValidationError(ValidationError::ShapeMismatch { field, expected, found }) => {
            assert_eq!(field, "materials[0].carPlate");
            assert_eq!(expected, "object");
            assert_eq!(found, "string");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn same_variant_merges_item_content() {
    let current = profile(serde_json::json!({
        "id": "p", "competences": [{"id": "c1", "type": "drivingLicense", "drivingLicenseId": "X1", "name": "B"}]
    }));
    let patch = PatchBuilder::new()
        .identified(
            "competences",
            vec![IdentifiedItemPatch::with_id("c1")
                .kind(ItemKind::DrivingLicense)
                .field("drivingLicenseId", "X2")],
        )
        .build();
    let outcome = engine().merge(&current, &patch).unwrap();
    let item = &outcome.profile.field("competences").unwrap().as_list().unwrap()[0];
    let item = item.as_object().unwrap();
    assert_eq!(item["drivingLicenseId"], FieldValue::text("X2"));
    assert_eq!(item["name"], FieldValue::text("B"));
    assert_eq!(item["type"], FieldValue::text("drivingLicense"));
}

#[test]
fn positional_patch_longer_than_current_pads_absent_entries_with_null() {
    let current = profile(serde_json::json!({"id": "p", "relationships": []}));
    let patch = PatchBuilder::new()
        .positional(
            "relationships",
            vec![FieldPatch::Absent, FieldPatch::from("friend")],
        )
        .build();
    let outcome = engine().merge(&current, &patch).unwrap();
    assert_eq!(
        outcome.profile.field("relationships"),
        Some(&FieldValue::List(vec![FieldValue::Null, FieldValue::text("friend")]))
    );
}

#[test]
fn replace_drops_unmentioned_content_but_keeps_item_ids() {
    let current = profile(serde_json::json!({
        "id": "p", "_creationTs": 5, "_lastUpdateTs": 6,
        "email": "a@b.c",
        "norms": [{"id": "n1", "attribute": "x", "operator": "EQUALS"}]
    }));
    let patch = ProfileSchema::default()
        .decode(&serde_json::json!({"norms": [{"id": "n1", "attribute": "y"}]}))
        .unwrap();
    let outcome = engine().replace(&current, &patch).unwrap();
    assert_eq!(
        serde_json::to_value(&outcome.profile).unwrap(),
        serde_json::json!({
            "id": "p", "_creationTs": 5, "_lastUpdateTs": 6,
            "norms": [{"id": "n1", "attribute": "y"}]
        })
    );
    assert_eq!(outcome.changed_field_list(), vec!["email", "norms"]);
}
