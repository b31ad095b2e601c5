//! Data model: profile documents, historic snapshots, rating events and
//! trust queries.

pub mod historic;
pub mod item_key;
pub mod item_kind;
pub mod profile;
pub mod rating;
pub mod trust;
pub mod value;

/// Seconds since the Unix epoch.
pub type Timestamp = i64;

pub use historic::{HistoricQuery, HistoricSnapshot, Page, SortOrder};
pub use item_key::ItemKey;
pub use item_kind::ItemKind;
pub use profile::{ProfileDocument, VersionedProfile};
pub use rating::{RatingEvent, RatingField, RatingOrder, RatingQuery};
pub use trust::{IdFilter, TrustFilter, TrustQuery, TrustStrategy};
pub use value::{Document, FieldValue};
