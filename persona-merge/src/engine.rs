//! Field-shape driven merge of partial patches into profile documents.
//!
//! Rules per field of the patch:
//! - `Absent` keeps the current value.
//! - `Scalar` replaces the current value; `Null` removes the field.
//! - `Object` merges recursively; fields missing from the patch survive.
//! - `IdentifiedList` is a full replacement list. Items whose id matches a
//!   current item merge into it; other items are new and get fresh ids. An
//!   item without an id merges into a current item without one at the same
//!   index.
//! - `PositionalList` merges `patch[i]` into `current[i]`, appending past
//!   the end.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use persona_core::constants::{
    CREATION_TS_FIELD, ITEM_ID_FIELD, ITEM_KIND_FIELD, LAST_UPDATE_TS_FIELD, PROFILE_ID_FIELD,
};
use persona_core::errors::{PersonaResult, ValidationError};
use persona_core::models::{Document, FieldValue, ItemKind, ProfileDocument};
use persona_core::traits::IdGenerator;

use crate::diff::changed_fields;
use crate::patch::{FieldPatch, IdentifiedItemPatch, PartialDocument};

/// A merged document and the top-level fields that differ from the input.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub profile: ProfileDocument,
    pub changed_fields: BTreeSet<String>,
}

impl MergeOutcome {
    pub(crate) fn between(before: &ProfileDocument, after: ProfileDocument) -> Self {
        let changed_fields = changed_fields(&before.fields, &after.fields);
        Self {
            profile: after,
            changed_fields,
        }
    }

    /// True when no top-level field changed.
    pub fn is_unchanged(&self) -> bool {
        self.changed_fields.is_empty()
    }

    pub fn changed_field_list(&self) -> Vec<String> {
        self.changed_fields.iter().cloned().collect()
    }
}

/// How a patch treats content it does not mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Keep it.
    Merge,
    /// Drop it. Current list items are consulted only to keep their ids.
    Replace,
}

/// Stateless apart from its identifier source.
#[derive(Clone)]
pub struct MergeEngine {
    ids: Arc<dyn IdGenerator>,
}

impl std::fmt::Debug for MergeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MergeEngine").finish_non_exhaustive()
    }
}

impl MergeEngine {
    /// Engine drawing fresh item ids from `ids`.
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }

    /// Merge `patch` into `current`.
    ///
    /// Store-managed fields (`id`, timestamps) in the patch are ignored.
    pub fn merge(
        &self,
        current: &ProfileDocument,
        patch: &PartialDocument,
    ) -> PersonaResult<MergeOutcome> {
        let fields = self.merge_document(&current.fields, patch, "", Mode::Merge)?;
        Ok(self.outcome(current, fields))
    }

    /// Replace the whole content of `current` with `patch`.
    ///
    /// Identified items that name a current item keep its id; their content
    /// is taken from the patch alone.
    pub fn replace(
        &self,
        current: &ProfileDocument,
        patch: &PartialDocument,
    ) -> PersonaResult<MergeOutcome> {
        let fields = self.merge_document(&current.fields, patch, "", Mode::Replace)?;
        Ok(self.outcome(current, fields))
    }

    fn outcome(&self, current: &ProfileDocument, fields: Document) -> MergeOutcome {
        let mut merged = current.clone();
        merged.fields = fields;
        MergeOutcome::between(current, merged)
    }

    pub(crate) fn merge_document(
        &self,
        current: &Document,
        patch: &PartialDocument,
        path: &str,
        mode: Mode,
    ) -> Result<Document, ValidationError> {
        let mut merged = match mode {
            Mode::Merge => current.clone(),
            Mode::Replace => Document::new(),
        };
        for (name, field_patch) in patch {
            if path.is_empty() && is_store_managed(name) {
                continue;
            }
            if matches!(field_patch, FieldPatch::Absent) {
                continue;
            }
            let existing = current.get(name).unwrap_or(&FieldValue::Null);
            let value =
                self.merge_value(existing, field_patch, &child_path(path, name), mode)?;
            if value.is_null() {
                merged.remove(name);
            } else {
                merged.insert(name.clone(), value);
            }
        }
        Ok(merged)
    }

    pub(crate) fn merge_value(
        &self,
        current: &FieldValue,
        patch: &FieldPatch,
        path: &str,
        mode: Mode,
    ) -> Result<FieldValue, ValidationError> {
        match patch {
            FieldPatch::Absent => Ok(current.clone()),
            FieldPatch::Scalar(value) => Ok(value.clone()),
            FieldPatch::Object(nested) => {
                let base = match current {
                    FieldValue::Null => &EMPTY,
                    FieldValue::Object(doc) => doc,
                    other => return Err(shape_mismatch(path, "object", other)),
                };
                Ok(FieldValue::Object(
                    self.merge_document(base, nested, path, mode)?,
                ))
            }
            FieldPatch::IdentifiedList(items) => {
                let base = list_or_empty(current, path)?;
                Ok(FieldValue::List(
                    self.merge_identified(base, items, path, mode)?,
                ))
            }
            FieldPatch::PositionalList(items) => {
                let base = list_or_empty(current, path)?;
                Ok(FieldValue::List(
                    self.merge_positional(base, items, path, mode)?,
                ))
            }
        }
    }

    fn merge_identified(
        &self,
        current: &[FieldValue],
        patches: &[IdentifiedItemPatch],
        path: &str,
        mode: Mode,
    ) -> Result<Vec<FieldValue>, ValidationError> {
        let by_id: HashMap<&str, &Document> = current
            .iter()
            .filter_map(FieldValue::as_object)
            .filter_map(|doc| item_id(doc).map(|id| (id, doc)))
            .collect();
        let mut used: HashSet<String> = HashSet::new();
        let mut merged = Vec::with_capacity(patches.len());

        for (index, item) in patches.iter().enumerate() {
            let item_path = index_path(path, index);
            let matched = item
                .id
                .as_deref()
                .and_then(|id| by_id.get(id).map(|doc| (id, *doc)));
            let value = match matched {
                Some((id, existing)) => {
                    if !used.insert(id.to_string()) {
                        return Err(duplicate(path, id));
                    }
                    let base = if mode == Mode::Replace || kind_changes(existing, item.kind) {
                        &EMPTY
                    } else {
                        existing
                    };
                    self.build_item(base, item, id, &item_path, mode)?
                }
                None => {
                    let id = self.fresh_id(path, |candidate| {
                        by_id.contains_key(candidate) || used.contains(candidate)
                    })?;
                    used.insert(id.clone());
                    if let Some(requested) = item.id.as_deref() {
                        tracing::debug!(
                            field = %path,
                            requested = %requested,
                            assigned = %id,
                            "unknown item identifier replaced"
                        );
                    }
                    // An item without an id merges into an id-less item at the same index.
                    let base = unidentified_at(current, index, item)
                        .filter(|existing| {
                            mode == Mode::Merge && !kind_changes(existing, item.kind)
                        })
                        .unwrap_or(&EMPTY);
                    self.build_item(base, item, &id, &item_path, mode)?
                }
            };
            merged.push(value);
        }
        Ok(merged)
    }

    fn merge_positional(
        &self,
        current: &[FieldValue],
        patches: &[FieldPatch],
        path: &str,
        mode: Mode,
    ) -> Result<Vec<FieldValue>, ValidationError> {
        let mut merged = match mode {
            Mode::Merge => current.to_vec(),
            Mode::Replace => Vec::with_capacity(patches.len()),
        };
        for (index, item) in patches.iter().enumerate() {
            let item_path = index_path(path, index);
            if index < merged.len() {
                merged[index] = self.merge_value(&merged[index], item, &item_path, mode)?;
            } else {
                merged.push(self.merge_value(&FieldValue::Null, item, &item_path, mode)?);
            }
        }
        Ok(merged)
    }

    /// Merge `item` into `base` and stamp the identifier and kind.
    pub(crate) fn build_item(
        &self,
        base: &Document,
        item: &IdentifiedItemPatch,
        id: &str,
        path: &str,
        mode: Mode,
    ) -> Result<FieldValue, ValidationError> {
        let mut doc = self.merge_document(base, &item.fields, path, mode)?;
        doc.insert(ITEM_ID_FIELD.to_string(), FieldValue::text(id));
        if let Some(kind) = item.kind {
            doc.insert(
                ITEM_KIND_FIELD.to_string(),
                FieldValue::text(kind.discriminator()),
            );
        }
        Ok(FieldValue::Object(doc))
    }

    /// Draw identifiers until one is not `taken`. Gives up with a duplicate
    /// error after [`MAX_ID_ATTEMPTS`] clashes.
    pub(crate) fn fresh_id(
        &self,
        path: &str,
        taken: impl Fn(&str) -> bool,
    ) -> Result<String, ValidationError> {
        let mut last = String::new();
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = self.ids.next_id();
            if !taken(&candidate) {
                return Ok(candidate);
            }
            tracing::debug!(
                field = %path,
                id = %candidate,
                "generated identifier taken, drawing again"
            );
            last = candidate;
        }
        Err(duplicate(path, &last))
    }
}

/// Generated identifiers tried before a merge gives up.
pub const MAX_ID_ATTEMPTS: usize = 32;

static EMPTY: Document = Document::new();

fn unidentified_at<'a>(
    current: &'a [FieldValue],
    index: usize,
    item: &IdentifiedItemPatch,
) -> Option<&'a Document> {
    if item.id.is_some() {
        return None;
    }
    current
        .get(index)
        .and_then(FieldValue::as_object)
        .filter(|doc| item_id(doc).is_none())
}

fn is_store_managed(name: &str) -> bool {
    name == PROFILE_ID_FIELD || name == CREATION_TS_FIELD || name == LAST_UPDATE_TS_FIELD
}

pub(crate) fn item_id(doc: &Document) -> Option<&str> {
    doc.get(ITEM_ID_FIELD).and_then(FieldValue::as_str)
}

pub(crate) fn item_kind(doc: &Document) -> Option<ItemKind> {
    doc.get(ITEM_KIND_FIELD)
        .and_then(FieldValue::as_str)
        .and_then(ItemKind::parse)
}

pub(crate) fn kind_changes(existing: &Document, requested: Option<ItemKind>) -> bool {
    requested.is_some() && requested != item_kind(existing)
}

pub(crate) fn list_or_empty<'a>(
    current: &'a FieldValue,
    path: &str,
) -> Result<&'a [FieldValue], ValidationError> {
    match current {
        FieldValue::Null => Ok(&[]),
        FieldValue::List(items) => Ok(items),
        other => Err(shape_mismatch(path, "list", other)),
    }
}

pub(crate) fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

pub(crate) fn index_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

pub(crate) fn shape_mismatch(path: &str, expected: &str, found: &FieldValue) -> ValidationError {
    ValidationError::ShapeMismatch {
        field: path.to_string(),
        expected: expected.to_string(),
        found: found.kind_name().to_string(),
    }
}

pub(crate) fn duplicate(path: &str, id: &str) -> ValidationError {
    ValidationError::DuplicateIdentifier {
        field: path.to_string(),
        id: id.to_string(),
    }
}
