//! Structured log events for key operations.
//!
//! Each function emits one `tracing` event with an `event` name field.

/// A profile was inserted.
pub fn profile_created(profile_id: &str) {
    tracing::info!(
        event = "profile_created",
        profile_id = %profile_id,
        "profile created"
    );
}

/// A profile write committed at `revision`.
pub fn profile_updated(profile_id: &str, changed_fields: &[String], revision: i64) {
    tracing::info!(
        event = "profile_updated",
        profile_id = %profile_id,
        changed_fields = ?changed_fields,
        revision = revision,
        "profile updated"
    );
}

/// A profile and `historic_rows` of its snapshots were removed.
pub fn profile_deleted(profile_id: &str, historic_rows: usize) {
    tracing::info!(
        event = "profile_deleted",
        profile_id = %profile_id,
        historic_rows = historic_rows,
        "profile deleted"
    );
}

/// The document write succeeded but its snapshot was not recorded.
pub fn historic_append_failed(profile_id: &str, error: &dyn std::fmt::Display) {
    tracing::warn!(
        event = "historic_append_failed",
        profile_id = %profile_id,
        error = %error,
        "historic snapshot not recorded"
    );
}

/// The profile was deleted but its snapshots were not.
pub fn historic_purge_failed(profile_id: &str, error: &dyn std::fmt::Display) {
    tracing::warn!(
        event = "historic_purge_failed",
        profile_id = %profile_id,
        error = %error,
        "historic snapshots not deleted"
    );
}

/// The write succeeded but the change notifier returned an error.
pub fn notification_failed(profile_id: &str, error: &dyn std::fmt::Display) {
    tracing::warn!(
        event = "notification_failed",
        profile_id = %profile_id,
        error = %error,
        "change notification failed"
    );
}

/// A conditional write found a newer revision.
pub fn write_conflict(profile_id: &str, attempt: u32) {
    tracing::debug!(
        event = "write_conflict",
        profile_id = %profile_id,
        attempt = attempt,
        "stale revision, retrying"
    );
}

/// A trust value was computed over `events` ratings.
pub fn trust_aggregated(strategy: &str, events: usize, value: f64) {
    tracing::info!(
        event = "trust_aggregated",
        strategy = %strategy,
        events = events,
        value = value,
        "trust aggregated"
    );
}

/// A rating event was stored.
pub fn rating_recorded(source_id: &str, target_id: &str, rating: f64) {
    tracing::info!(
        event = "rating_recorded",
        source_id = %source_id,
        target_id = %target_id,
        rating = rating,
        "rating recorded"
    );
}
