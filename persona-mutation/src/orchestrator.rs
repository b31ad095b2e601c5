//! The profile write flow.
//!
//! Every mutation is load → transform → conditional replace. The replace
//! carries the revision the document was read at; a stale write reloads and
//! reruns the transform. Once the primary write is committed, the history
//! append and the change notification run as separate best-effort steps
//! whose failures are logged and never returned.

use std::sync::Arc;

use serde_json::Value;

use persona_core::config::PersonaConfig;
use persona_core::errors::{PersonaError, PersonaResult, ValidationError};
use persona_core::models::{
    FieldValue, HistoricQuery, HistoricSnapshot, ItemKey, Page, ProfileDocument, VersionedProfile,
};
use persona_core::traits::{
    IChangeNotifier, IHistoricStorage, IProfileStorage, IdGenerator, WriteOutcome,
};
use persona_merge::{ItemPatch, MergeEngine, MergeOutcome, PartialDocument, ProfileSchema};
use persona_observability::events;

/// A committed item mutation: the stored document and the item affected.
/// For removals `item` is the item as it was before.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemChange {
    pub profile: ProfileDocument,
    pub item: FieldValue,
}

/// Coordinates every profile write: load, merge, conditional commit,
/// history append and change notification.
///
/// A commit that loses a race with another writer is retried from a fresh
/// load up to `mutation.max_write_retries` times. History and notification
/// failures are logged and never fail the write.
pub struct ProfileMutationOrchestrator {
    profiles: Arc<dyn IProfileStorage>,
    history: Arc<dyn IHistoricStorage>,
    notifier: Arc<dyn IChangeNotifier>,
    engine: MergeEngine,
    ids: Arc<dyn IdGenerator>,
    schema: ProfileSchema,
    config: PersonaConfig,
}

impl std::fmt::Debug for ProfileMutationOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileMutationOrchestrator")
            .field("engine", &self.engine)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ProfileMutationOrchestrator {
    /// `ids` supplies both generated profile ids and new list item ids.
    pub fn new(
        profiles: Arc<dyn IProfileStorage>,
        history: Arc<dyn IHistoricStorage>,
        notifier: Arc<dyn IChangeNotifier>,
        ids: Arc<dyn IdGenerator>,
        config: PersonaConfig,
    ) -> Self {
        Self {
            profiles,
            history,
            notifier,
            engine: MergeEngine::new(Arc::clone(&ids)),
            ids,
            schema: ProfileSchema::default(),
            config,
        }
    }

    /// Decode JSON patches with `schema` instead of the default profile schema.
    pub fn with_schema(mut self, schema: ProfileSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn schema(&self) -> &ProfileSchema {
        &self.schema
    }

    pub fn config(&self) -> &PersonaConfig {
        &self.config
    }

    /// Decode a JSON patch with the configured schema.
    pub fn decode_patch(&self, json: &Value) -> PersonaResult<PartialDocument> {
        Ok(self.schema.decode(json)?)
    }

    // --- Whole-profile operations ---

    /// Store a new profile built from `patch`. A profile id is generated
    /// when none is given.
    pub fn create_profile(
        &self,
        id: Option<String>,
        patch: &PartialDocument,
    ) -> PersonaResult<ProfileDocument> {
        let id = id.unwrap_or_else(|| self.ids.next_id());
        let outcome = self.engine.merge(&ProfileDocument::new(id.as_str()), patch)?;
        let stored = self.profiles.insert(&outcome.profile)?;
        events::profile_created(&id);
        self.notify(&id, &outcome.changed_field_list());
        Ok(stored.profile)
    }

    /// Load a profile. Fails with `ProfileNotFound` when it does not exist.
    pub fn get_profile(&self, id: &str) -> PersonaResult<ProfileDocument> {
        Ok(self.load(id)?.profile)
    }

    /// Merge `patch` into the stored profile.
    pub fn update_profile(
        &self,
        id: &str,
        patch: &PartialDocument,
        record_history: bool,
    ) -> PersonaResult<ProfileDocument> {
        let (profile, ()) = self.apply(id, record_history, |current| {
            Ok((self.engine.merge(current, patch)?, ()))
        })?;
        Ok(profile)
    }

    /// Same flow as [`update_profile`](Self::update_profile); callers use it
    /// for patches built as a full merge of another document.
    pub fn merge_profile(
        &self,
        id: &str,
        patch: &PartialDocument,
        record_history: bool,
    ) -> PersonaResult<ProfileDocument> {
        self.update_profile(id, patch, record_history)
    }

    /// Replace every field of the stored profile. Rejected when the result
    /// equals what is stored.
    pub fn replace_profile(
        &self,
        id: &str,
        document: &PartialDocument,
        record_history: bool,
    ) -> PersonaResult<ProfileDocument> {
        let (profile, ()) = self.apply(id, record_history, |current| {
            let outcome = self.engine.replace(current, document)?;
            if outcome.profile.content_equals(current) {
                return Err(ValidationError::UnchangedUpdate { id: id.to_string() }.into());
            }
            Ok((outcome, ()))
        })?;
        Ok(profile)
    }

    /// Remove the profile and all of its history.
    pub fn delete_profile(&self, id: &str) -> PersonaResult<()> {
        if !self.profiles.delete(id)? {
            return Err(PersonaError::ProfileNotFound { id: id.to_string() });
        }
        let historic_rows = match self.history.delete_for_profile(id) {
            Ok(rows) => rows,
            Err(e) => {
                events::historic_purge_failed(id, &e);
                0
            }
        };
        events::profile_deleted(id, historic_rows);
        Ok(())
    }

    /// Page through the snapshots of one profile. A zero limit means
    /// `history.default_page_limit`; larger limits are capped at
    /// `history.max_page_limit`.
    pub fn query_history(&self, query: &HistoricQuery) -> PersonaResult<Page<HistoricSnapshot>> {
        let history = &self.config.history;
        let limit = match query.limit {
            0 => history.default_page_limit,
            limit => limit,
        }
        .min(history.max_page_limit);
        if limit == query.limit {
            return self.history.query(query);
        }
        let mut bounded = query.clone();
        bounded.limit = limit;
        self.history.query(&bounded)
    }

    // --- List item operations ---

    /// Read one item of a list field.
    pub fn get_item(&self, id: &str, field: &str, key: &ItemKey) -> PersonaResult<FieldValue> {
        let current = self.load(id)?;
        self.engine.get_item(&current.profile, field, key)
    }

    /// Append an item to a list field and commit.
    pub fn add_item(&self, id: &str, field: &str, item: &ItemPatch) -> PersonaResult<ItemChange> {
        self.apply_item(id, |current| self.engine.add_item(current, field, item))
    }

    /// Replace one item and commit. Identified items keep their id.
    pub fn replace_item(
        &self,
        id: &str,
        field: &str,
        key: &ItemKey,
        item: &ItemPatch,
    ) -> PersonaResult<ItemChange> {
        self.apply_item(id, |current| {
            self.engine.replace_item(current, field, key, item)
        })
    }

    /// Merge a partial item into one item and commit.
    pub fn merge_item(
        &self,
        id: &str,
        field: &str,
        key: &ItemKey,
        item: &ItemPatch,
    ) -> PersonaResult<ItemChange> {
        self.apply_item(id, |current| self.engine.merge_item(current, field, key, item))
    }

    /// Remove one item and commit. The change carries the removed item.
    pub fn remove_item(&self, id: &str, field: &str, key: &ItemKey) -> PersonaResult<ItemChange> {
        self.apply_item(id, |current| self.engine.remove_item(current, field, key))
    }

    fn apply_item<F>(&self, id: &str, transform: F) -> PersonaResult<ItemChange>
    where
        F: Fn(&ProfileDocument) -> PersonaResult<persona_merge::ItemOutcome>,
    {
        let record_history = self.config.history.record_by_default;
        let (profile, item) = self.apply(id, record_history, |current| {
            let changed = transform(current)?;
            Ok((changed.outcome, changed.item))
        })?;
        Ok(ItemChange { profile, item })
    }

    // --- Write flow ---

    fn load(&self, id: &str) -> PersonaResult<VersionedProfile> {
        self.profiles
            .get(id)?
            .ok_or_else(|| PersonaError::ProfileNotFound { id: id.to_string() })
    }

    /// Commit `transform(current)` with a revision check, retrying on
    /// conflicts, then run the secondary steps.
    fn apply<T, F>(
        &self,
        id: &str,
        record_history: bool,
        transform: F,
    ) -> PersonaResult<(ProfileDocument, T)>
    where
        F: Fn(&ProfileDocument) -> PersonaResult<(MergeOutcome, T)>,
    {
        let attempts = self.config.mutation.max_write_retries.max(1);
        for attempt in 1..=attempts {
            let current = self.load(id)?;
            let (outcome, extra) = transform(&current.profile)?;
            match self.profiles.replace(&outcome.profile, current.revision)? {
                WriteOutcome::Applied(stored) => {
                    let changed = outcome.changed_field_list();
                    if record_history {
                        self.record_history(&current.profile, &stored.profile);
                    }
                    self.notify(id, &changed);
                    events::profile_updated(id, &changed, stored.revision);
                    return Ok((stored.profile, extra));
                }
                WriteOutcome::Stale => events::write_conflict(id, attempt),
                WriteOutcome::Missing => {
                    return Err(PersonaError::ProfileNotFound { id: id.to_string() })
                }
            }
        }
        Err(PersonaError::ConcurrentModification {
            id: id.to_string(),
            attempts,
        })
    }

    /// The previous document was valid from its last update (or creation)
    /// until the update just committed.
    fn record_history(&self, previous: &ProfileDocument, stored: &ProfileDocument) {
        let from = previous.last_update_ts.max(previous.creation_ts);
        let to = stored.last_update_ts;
        if let Err(e) = self.history.append(&previous.id, from, to, previous) {
            events::historic_append_failed(&previous.id, &e);
        }
    }

    fn notify(&self, id: &str, changed_fields: &[String]) {
        if let Err(e) = self.notifier.notify(id, changed_fields) {
            events::notification_failed(id, &e);
        }
    }
}
