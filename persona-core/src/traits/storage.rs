use crate::errors::PersonaResult;
use crate::models::{
    HistoricQuery, HistoricSnapshot, Page, ProfileDocument, RatingEvent, RatingQuery, Timestamp,
    TrustFilter, VersionedProfile,
};

/// Result of a conditional replace.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    /// Stored; carries the document as persisted and its new revision.
    Applied(VersionedProfile),
    /// Another writer got there first.
    Stale,
    /// The profile no longer exists.
    Missing,
}

/// Current-state profile documents, keyed by id.
pub trait IProfileStorage: Send + Sync {
    // --- CRUD ---

    /// Store a new profile, stamping both timestamps. Fails with
    /// `DuplicateIdentifier` when the id is taken.
    fn insert(&self, profile: &ProfileDocument) -> PersonaResult<VersionedProfile>;
    fn get(&self, id: &str) -> PersonaResult<Option<VersionedProfile>>;
    /// Replace the document if it is still at `expected_revision`.
    /// Creation timestamp is preserved; the update timestamp never moves
    /// backwards.
    fn replace(
        &self,
        profile: &ProfileDocument,
        expected_revision: i64,
    ) -> PersonaResult<WriteOutcome>;
    fn delete(&self, id: &str) -> PersonaResult<bool>;

    // --- Aggregation ---
    fn exists(&self, id: &str) -> PersonaResult<bool>;
    fn count(&self) -> PersonaResult<usize>;
}

/// Append-only history of past profile states.
pub trait IHistoricStorage: Send + Sync {
    fn append(
        &self,
        profile_id: &str,
        from: Timestamp,
        to: Timestamp,
        profile: &ProfileDocument,
    ) -> PersonaResult<()>;
    fn query(&self, query: &HistoricQuery) -> PersonaResult<Page<HistoricSnapshot>>;
    fn delete_for_profile(&self, profile_id: &str) -> PersonaResult<usize>;
}

/// Rating events used for trust computation.
pub trait IRatingStorage: Send + Sync {
    /// Store an event. The store sets `report_time` and returns the stored
    /// event.
    fn insert_rating(&self, event: &RatingEvent) -> PersonaResult<RatingEvent>;
    fn find_ratings(&self, query: &RatingQuery) -> PersonaResult<Vec<RatingEvent>>;
    fn count_ratings(&self, filter: &TrustFilter) -> PersonaResult<usize>;
    /// Remove every event where the user is source or target.
    fn delete_ratings_referencing(&self, user_id: &str) -> PersonaResult<usize>;
}
