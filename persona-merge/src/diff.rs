use std::collections::BTreeSet;

use persona_core::models::{Document, FieldValue};

/// Names of top-level fields whose serialized value differs between the two
/// documents. A missing field serializes as `null`.
pub fn changed_fields(before: &Document, after: &Document) -> BTreeSet<String> {
    before
        .keys()
        .chain(after.keys())
        .filter(|name| serialized(before.get(*name)) != serialized(after.get(*name)))
        .cloned()
        .collect()
}

fn serialized(value: Option<&FieldValue>) -> serde_json::Value {
    value
        .map(serde_json::Value::from)
        .unwrap_or(serde_json::Value::Null)
}
