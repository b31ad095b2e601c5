//! Typed partial documents.
//!
//! Every field of a patch states its shape up front, so the merge rules are
//! a total match over [`FieldPatch`] instead of guesses about JSON values.

use std::collections::BTreeMap;

use persona_core::models::{Document, FieldValue, ItemKind};

/// A partial document: only the fields the caller wants to touch.
pub type PartialDocument = BTreeMap<String, FieldPatch>;

/// What a patch says about one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldPatch {
    /// Leave the current value alone.
    Absent,
    /// Replace the current value outright. `Null` clears the field.
    Scalar(FieldValue),
    /// Merge field by field into the current object.
    Object(PartialDocument),
    /// Full replacement list whose items are matched to current items by id.
    IdentifiedList(Vec<IdentifiedItemPatch>),
    /// Items merged into the current list by position.
    PositionalList(Vec<FieldPatch>),
}

impl FieldPatch {
    /// Clear the field.
    pub fn clear() -> Self {
        Self::Scalar(FieldValue::Null)
    }

    /// Derive a patch from a plain value by its shape: objects merge
    /// recursively, everything else (lists included) replaces.
    pub fn from_value(value: &FieldValue) -> Self {
        match value {
            FieldValue::Object(doc) => Self::Object(partial_from_document(doc)),
            other => Self::Scalar(other.clone()),
        }
    }
}

impl From<FieldValue> for FieldPatch {
    fn from(value: FieldValue) -> Self {
        Self::Scalar(value)
    }
}

macro_rules! scalar_patch_from {
    ($($ty:ty),*) => {
        $(impl From<$ty> for FieldPatch {
            fn from(value: $ty) -> Self {
                Self::Scalar(FieldValue::from(value))
            }
        })*
    };
}

scalar_patch_from!(&str, String, i64, f64, bool);

/// Shape-derived patch for every field of `doc`.
pub fn partial_from_document(doc: &Document) -> PartialDocument {
    doc.iter()
        .map(|(name, value)| (name.clone(), FieldPatch::from_value(value)))
        .collect()
}

/// One item of an identified list patch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentifiedItemPatch {
    /// Identifier of the current item to merge into. Unknown or missing
    /// identifiers make this a new item with a generated id.
    pub id: Option<String>,
    /// Item variant. A variant different from the matched item's replaces
    /// its content.
    pub kind: Option<ItemKind>,
    pub fields: PartialDocument,
}

impl IdentifiedItemPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch for the item carrying `id`.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn kind(mut self, kind: ItemKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn field(mut self, name: impl Into<String>, patch: impl Into<FieldPatch>) -> Self {
        self.fields.insert(name.into(), patch.into());
        self
    }
}

/// Fluent construction of a [`PartialDocument`].
#[derive(Debug, Clone, Default)]
pub struct PatchBuilder {
    fields: PartialDocument,
}

impl PatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields
            .insert(name.into(), FieldPatch::Scalar(value.into()));
        self
    }

    pub fn clear(mut self, name: impl Into<String>) -> Self {
        self.fields.insert(name.into(), FieldPatch::clear());
        self
    }

    pub fn object(mut self, name: impl Into<String>, nested: PatchBuilder) -> Self {
        self.fields
            .insert(name.into(), FieldPatch::Object(nested.build()));
        self
    }

    pub fn identified(
        mut self,
        name: impl Into<String>,
        items: Vec<IdentifiedItemPatch>,
    ) -> Self {
        self.fields
            .insert(name.into(), FieldPatch::IdentifiedList(items));
        self
    }

    pub fn positional(mut self, name: impl Into<String>, items: Vec<FieldPatch>) -> Self {
        self.fields
            .insert(name.into(), FieldPatch::PositionalList(items));
        self
    }

    pub fn patch(mut self, name: impl Into<String>, patch: FieldPatch) -> Self {
        self.fields.insert(name.into(), patch);
        self
    }

    /// Finish the patch.
    pub fn build(self) -> PartialDocument {
        self.fields
    }
}
