//! Validation and recording of rating events, and cleanup by user id.

use std::sync::Arc;

use persona_core::config::TrustConfig;
use persona_core::errors::{PersonaResult, ValidationError};
use persona_core::models::{RatingEvent, RatingField};
use persona_core::traits::IRatingStorage;
use persona_observability::events;

/// Check a rating event before it is stored.
///
/// The rating must lie in `[0, 1]`; source and target must be non-empty,
/// distinct, and no longer than `max_id_len`; optional ids must also fit.
pub fn validate_rating(event: &RatingEvent, max_id_len: usize) -> Result<(), ValidationError> {
    if !(0.0..=1.0).contains(&event.rating) {
        return Err(ValidationError::InvalidValue {
            field: "rating".to_string(),
            reason: format!("{} is outside [0, 1]", event.rating),
        });
    }
    for field in RatingField::ALL {
        let Some(value) = event.field(field) else {
            continue;
        };
        let required = matches!(field, RatingField::SourceId | RatingField::TargetId);
        if required && value.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: field.name().to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if value.chars().count() > max_id_len {
            return Err(ValidationError::InvalidValue {
                field: field.name().to_string(),
                reason: format!("longer than {max_id_len} characters"),
            });
        }
    }
    if event.source_id == event.target_id {
        return Err(ValidationError::InvalidValue {
            field: RatingField::TargetId.name().to_string(),
            reason: "a user cannot rate themselves".to_string(),
        });
    }
    Ok(())
}

/// Validates rating events and writes them to the rating store.
pub struct RatingRecorder {
    ratings: Arc<dyn IRatingStorage>,
    config: TrustConfig,
}

impl RatingRecorder {
    /// Recorder enforcing `config.max_identifier_length`.
    pub fn new(ratings: Arc<dyn IRatingStorage>, config: TrustConfig) -> Self {
        Self { ratings, config }
    }

    /// Validate and store an event. The stored event carries the report
    /// time assigned by the store.
    pub fn record(&self, event: &RatingEvent) -> PersonaResult<RatingEvent> {
        validate_rating(event, self.config.max_identifier_length)?;
        let stored = self.ratings.insert_rating(event)?;
        events::rating_recorded(&stored.source_id, &stored.target_id, stored.rating);
        Ok(stored)
    }

    /// Remove every event where `user_id` is the source or the target.
    pub fn delete_events_referencing(&self, user_id: &str) -> PersonaResult<usize> {
        let removed = self.ratings.delete_ratings_referencing(user_id)?;
        tracing::info!(user_id = %user_id, removed, "rating events purged");
        Ok(removed)
    }
}
