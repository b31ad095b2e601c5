//! # persona-merge
//!
//! Merges partial patches into profile documents.
//!
//! - [`MergeEngine`]: field-shape driven merge, full replacement, list-item operations
//! - [`FieldPatch`] / [`PartialDocument`]: the typed patch tree
//! - [`ProfileSchema`]: decodes JSON patches into typed patches
//! - [`changed_fields`]: top-level structural diff
//!
//! The engine performs no I/O. Fresh identifiers come from an injected
//! [`IdGenerator`](persona_core::traits::IdGenerator).

pub mod decode;
pub mod diff;
pub mod engine;
pub mod id_gen;
pub mod items;
pub mod patch;

pub use decode::{FieldShape, ProfileSchema};
pub use diff::changed_fields;
pub use engine::{MergeEngine, MergeOutcome, MAX_ID_ATTEMPTS};
pub use id_gen::{SequentialIdGenerator, UuidGenerator};
pub use items::{ItemOutcome, ItemPatch};
pub use patch::{FieldPatch, IdentifiedItemPatch, PartialDocument, PatchBuilder};
