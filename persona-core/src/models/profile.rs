use serde::{Deserialize, Serialize};

use super::value::{Document, FieldValue};
use super::Timestamp;

/// A stored user profile.
///
/// `id` and both timestamps are managed by the store; everything else lives
/// in `fields` and is flattened into the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDocument {
    pub id: String,
    #[serde(rename = "_creationTs", default)]
    pub creation_ts: Timestamp,
    #[serde(rename = "_lastUpdateTs", default)]
    pub last_update_ts: Timestamp,
    #[serde(flatten)]
    pub fields: Document,
}

impl ProfileDocument {
    /// An empty profile with unset timestamps.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            creation_ts: 0,
            last_update_ts: 0,
            fields: Document::new(),
        }
    }

    pub fn with_fields(id: impl Into<String>, fields: Document) -> Self {
        Self {
            fields,
            ..Self::new(id)
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Set a field; `Null` removes it.
    pub fn set_field(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    /// Compare user-visible content only, ignoring id and timestamps.
    pub fn content_equals(&self, other: &ProfileDocument) -> bool {
        self.fields == other.fields
    }
}

/// A profile together with the store revision it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedProfile {
    pub profile: ProfileDocument,
    pub revision: i64,
}
