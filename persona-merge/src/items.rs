//! Operations on a single item of a list field.
//!
//! Items are addressed by [`ItemKey`]: by their `id` in identified lists, or
//! by position in any list.

use persona_core::errors::{PersonaError, PersonaResult};
use persona_core::models::{Document, FieldValue, ItemKey, ProfileDocument};

use crate::engine::{
    duplicate, item_id, kind_changes, list_or_empty, shape_mismatch, MergeEngine, MergeOutcome,
    Mode,
};
use crate::patch::{FieldPatch, IdentifiedItemPatch};

/// Content for one list item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemPatch {
    Identified(IdentifiedItemPatch),
    Positional(FieldPatch),
}

/// A list-item mutation: the resulting document and the item affected by
/// it (for removals, the item as it was before).
#[derive(Debug, Clone, PartialEq)]
pub struct ItemOutcome {
    pub outcome: MergeOutcome,
    pub item: FieldValue,
}

impl MergeEngine {
    /// Look up one item of `field`.
    pub fn get_item(
        &self,
        current: &ProfileDocument,
        field: &str,
        key: &ItemKey,
    ) -> PersonaResult<FieldValue> {
        let items = items_of(current, field)?;
        let index = locate(items, field, key)?;
        Ok(items[index].clone())
    }

    /// Append a new item to `field`.
    ///
    /// An identified item naming an id already present in the list is
    /// rejected; any other id is replaced by a generated one.
    pub fn add_item(
        &self,
        current: &ProfileDocument,
        field: &str,
        item: &ItemPatch,
    ) -> PersonaResult<ItemOutcome> {
        let mut items = items_of(current, field)?.to_vec();
        let path = field.to_string();
        let value = match item {
            ItemPatch::Identified(patch) => {
                if let Some(id) = patch.id.as_deref() {
                    if position_of_id(&items, id).is_some() {
                        return Err(duplicate(&path, id).into());
                    }
                }
                let id = self.fresh_id(&path, |candidate| {
                    position_of_id(&items, candidate).is_some()
                })?;
                let item_path = format!("{path}[{}]", items.len());
                self.build_item(&Document::new(), patch, &id, &item_path, Mode::Merge)?
            }
            ItemPatch::Positional(patch) => {
                let item_path = format!("{path}[{}]", items.len());
                self.merge_value(&FieldValue::Null, patch, &item_path, Mode::Merge)?
            }
        };
        items.push(value.clone());
        Ok(self.with_items(current, field, items, value))
    }

    /// Replace the content of one item. Identified items keep their id.
    pub fn replace_item(
        &self,
        current: &ProfileDocument,
        field: &str,
        key: &ItemKey,
        item: &ItemPatch,
    ) -> PersonaResult<ItemOutcome> {
        self.rewrite_item(current, field, key, item, Mode::Replace)
    }

    /// Merge a partial item into one item.
    pub fn merge_item(
        &self,
        current: &ProfileDocument,
        field: &str,
        key: &ItemKey,
        item: &ItemPatch,
    ) -> PersonaResult<ItemOutcome> {
        self.rewrite_item(current, field, key, item, Mode::Merge)
    }

    /// Remove one item. The outcome carries the removed item.
    pub fn remove_item(
        &self,
        current: &ProfileDocument,
        field: &str,
        key: &ItemKey,
    ) -> PersonaResult<ItemOutcome> {
        let mut items = items_of(current, field)?.to_vec();
        let index = locate(&items, field, key)?;
        let removed = items.remove(index);
        Ok(self.with_items(current, field, items, removed))
    }

    fn rewrite_item(
        &self,
        current: &ProfileDocument,
        field: &str,
        key: &ItemKey,
        item: &ItemPatch,
        mode: Mode,
    ) -> PersonaResult<ItemOutcome> {
        let mut items = items_of(current, field)?.to_vec();
        let index = locate(&items, field, key)?;
        let item_path = format!("{field}[{index}]");
        let value = match item {
            ItemPatch::Identified(patch) => {
                let existing = match &items[index] {
                    FieldValue::Object(doc) => doc,
                    other => return Err(shape_mismatch(&item_path, "object", other).into()),
                };
                let id = match item_id(existing) {
                    Some(id) => id.to_string(),
                    None => self.fresh_id(field, |candidate| {
                        position_of_id(&items, candidate).is_some()
                    })?,
                };
                let base = if mode == Mode::Replace || kind_changes(existing, patch.kind) {
                    Document::new()
                } else {
                    existing.clone()
                };
                self.build_item(&base, patch, &id, &item_path, mode)?
            }
            ItemPatch::Positional(patch) => {
                let base = match mode {
                    Mode::Merge => items[index].clone(),
                    Mode::Replace => FieldValue::Null,
                };
                self.merge_value(&base, patch, &item_path, mode)?
            }
        };
        items[index] = value.clone();
        Ok(self.with_items(current, field, items, value))
    }

    fn with_items(
        &self,
        current: &ProfileDocument,
        field: &str,
        items: Vec<FieldValue>,
        item: FieldValue,
    ) -> ItemOutcome {
        let mut updated = current.clone();
        updated.set_field(field, FieldValue::List(items));
        ItemOutcome {
            outcome: MergeOutcome::between(current, updated),
            item,
        }
    }
}

fn items_of<'a>(current: &'a ProfileDocument, field: &str) -> PersonaResult<&'a [FieldValue]> {
    let value = current.field(field).unwrap_or(&FieldValue::Null);
    Ok(list_or_empty(value, field)?)
}

fn position_of_id(items: &[FieldValue], id: &str) -> Option<usize> {
    items
        .iter()
        .position(|item| item.as_object().and_then(item_id) == Some(id))
}

fn locate(items: &[FieldValue], field: &str, key: &ItemKey) -> PersonaResult<usize> {
    let found = match key {
        ItemKey::Id(id) => position_of_id(items, id),
        ItemKey::Index(index) => (*index < items.len()).then_some(*index),
    };
    found.ok_or_else(|| PersonaError::ItemNotFound {
        field: field.to_string(),
        key: key.to_string(),
    })
}
