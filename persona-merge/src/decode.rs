//! Schema-driven decoding of JSON patches.
//!
//! JSON alone cannot say whether an array is a list of identified items or
//! a positional list, so each top-level profile field is given a
//! [`FieldShape`]. Content nested below the top level is decoded by its
//! JSON shape: objects merge, everything else replaces.

use std::collections::BTreeMap;

use persona_core::constants::{
    CREATION_TS_FIELD, ITEM_ID_FIELD, ITEM_KIND_FIELD, LAST_UPDATE_TS_FIELD, PROFILE_ID_FIELD,
};
use persona_core::errors::ValidationError;
use persona_core::models::{FieldValue, ItemKind};
use serde_json::{Map, Value};

use crate::engine::{child_path, index_path};
use crate::patch::{FieldPatch, IdentifiedItemPatch, PartialDocument};

/// How a top-level field is decoded and merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    Scalar,
    Object,
    /// Items carry an `id`. `variant` names the one item kind the list may
    /// hold besides plain items.
    IdentifiedList { variant: Option<ItemKind> },
    PositionalList,
    /// A list the patch replaces as a whole.
    WholeList,
}

/// Shapes of the known top-level profile fields.
#[derive(Debug, Clone)]
pub struct ProfileSchema {
    fields: BTreeMap<String, FieldShape>,
}

impl Default for ProfileSchema {
    fn default() -> Self {
        use FieldShape::*;
        let mut schema = Self::empty();
        for name in [
            "gender",
            "email",
            "phoneNumber",
            "locale",
            "avatar",
            "nationality",
            "occupation",
        ] {
            schema = schema.field(name, Scalar);
        }
        schema
            .field("name", Object)
            .field("dateOfBirth", Object)
            .field("norms", IdentifiedList { variant: None })
            .field("plannedActivities", IdentifiedList { variant: None })
            .field("relevantLocations", IdentifiedList { variant: None })
            .field(
                "materials",
                IdentifiedList {
                    variant: Some(ItemKind::Car),
                },
            )
            .field(
                "competences",
                IdentifiedList {
                    variant: Some(ItemKind::DrivingLicense),
                },
            )
            .field("relationships", WholeList)
            .field("personalBehaviors", PositionalList)
            .field("meanings", PositionalList)
    }
}

impl ProfileSchema {
    /// A schema that knows no fields.
    pub fn empty() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, shape: FieldShape) -> Self {
        self.fields.insert(name.into(), shape);
        self
    }

    pub fn shape_of(&self, name: &str) -> Option<FieldShape> {
        self.fields.get(name).copied()
    }

    /// Decode a JSON object into a typed patch.
    ///
    /// Unknown fields are rejected. Store-managed fields are ignored.
    pub fn decode(&self, json: &Value) -> Result<PartialDocument, ValidationError> {
        let object = json.as_object().ok_or_else(|| ValidationError::ShapeMismatch {
            field: "$".to_string(),
            expected: "object".to_string(),
            found: json_kind(json).to_string(),
        })?;
        let mut patch = PartialDocument::new();
        for (name, value) in object {
            if [PROFILE_ID_FIELD, CREATION_TS_FIELD, LAST_UPDATE_TS_FIELD].contains(&name.as_str())
            {
                continue;
            }
            let shape = self
                .shape_of(name)
                .ok_or_else(|| ValidationError::UnknownField {
                    field: name.clone(),
                })?;
            patch.insert(name.clone(), decode_field(name, shape, value)?);
        }
        Ok(patch)
    }

    /// Decode one list item for the given field.
    pub fn decode_item(
        &self,
        field: &str,
        json: &Value,
    ) -> Result<crate::items::ItemPatch, ValidationError> {
        use crate::items::ItemPatch;
        match self.shape_of(field) {
            Some(FieldShape::IdentifiedList { variant }) => Ok(ItemPatch::Identified(
                decode_identified_item(field, variant, json)?,
            )),
            Some(FieldShape::PositionalList) => Ok(ItemPatch::Positional(decode_generic(json))),
            Some(FieldShape::WholeList) => Ok(ItemPatch::Positional(FieldPatch::Scalar(
                FieldValue::from(json),
            ))),
            Some(_) => Err(ValidationError::InvalidValue {
                field: field.to_string(),
                reason: "not a list field".to_string(),
            }),
            None => Err(ValidationError::UnknownField {
                field: field.to_string(),
            }),
        }
    }
}

fn decode_field(name: &str, shape: FieldShape, value: &Value) -> Result<FieldPatch, ValidationError> {
    if value.is_null() {
        return Ok(FieldPatch::clear());
    }
    match shape {
        FieldShape::Scalar => match value {
            Value::Array(_) | Value::Object(_) => Err(mismatch(name, "scalar", value)),
            scalar => Ok(FieldPatch::Scalar(FieldValue::from(scalar))),
        },
        FieldShape::Object => match value {
            Value::Object(map) => Ok(FieldPatch::Object(decode_object(map))),
            other => Err(mismatch(name, "object", other)),
        },
        FieldShape::IdentifiedList { variant } => {
            let items = value.as_array().ok_or_else(|| mismatch(name, "list", value))?;
            let decoded = items
                .iter()
                .enumerate()
                .map(|(i, item)| decode_identified_item(&index_path(name, i), variant, item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(FieldPatch::IdentifiedList(decoded))
        }
        FieldShape::PositionalList => {
            let items = value.as_array().ok_or_else(|| mismatch(name, "list", value))?;
            Ok(FieldPatch::PositionalList(
                items.iter().map(decode_generic).collect(),
            ))
        }
        FieldShape::WholeList => match value {
            Value::Array(_) => Ok(FieldPatch::Scalar(FieldValue::from(value))),
            other => Err(mismatch(name, "list", other)),
        },
    }
}

fn decode_identified_item(
    path: &str,
    variant: Option<ItemKind>,
    value: &Value,
) -> Result<IdentifiedItemPatch, ValidationError> {
    let map = value.as_object().ok_or_else(|| mismatch(path, "object", value))?;
    let id = match map.get(ITEM_ID_FIELD) {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) => Some(id.clone()),
        Some(other) => return Err(mismatch(&child_path(path, ITEM_ID_FIELD), "string", other)),
    };
    let kind = match (variant, map.get(ITEM_KIND_FIELD)) {
        (Some(_), None | Some(Value::Null)) => None,
        (Some(allowed), Some(Value::String(name))) => match ItemKind::parse(name) {
            Some(kind) if kind == allowed => Some(kind),
            _ => {
                return Err(ValidationError::UnknownVariant {
                    field: path.to_string(),
                    variant: name.clone(),
                })
            }
        },
        (Some(_), Some(other)) => {
            return Err(mismatch(&child_path(path, ITEM_KIND_FIELD), "string", other))
        }
        (None, _) => None,
    };
    let fields = map
        .iter()
        .filter(|(key, _)| {
            key.as_str() != ITEM_ID_FIELD && !(variant.is_some() && key.as_str() == ITEM_KIND_FIELD)
        })
        .map(|(key, value)| (key.clone(), decode_generic(value)))
        .collect();
    Ok(IdentifiedItemPatch { id, kind, fields })
}

fn decode_object(map: &Map<String, Value>) -> PartialDocument {
    map.iter()
        .map(|(key, value)| (key.clone(), decode_generic(value)))
        .collect()
}

fn decode_generic(value: &Value) -> FieldPatch {
    match value {
        Value::Object(map) => FieldPatch::Object(decode_object(map)),
        other => FieldPatch::Scalar(FieldValue::from(other)),
    }
}

fn mismatch(path: &str, expected: &str, found: &Value) -> ValidationError {
    ValidationError::ShapeMismatch {
        field: path.to_string(),
        expected: expected.to_string(),
        found: json_kind(found).to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
