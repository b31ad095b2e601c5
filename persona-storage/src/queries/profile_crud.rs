//! Insert, get, conditional replace and delete of profile documents.

use rusqlite::{params, Connection, OptionalExtension};

use persona_core::errors::{PersonaResult, StorageError, ValidationError};
use persona_core::models::{Document, ProfileDocument, Timestamp, VersionedProfile};
use persona_core::traits::WriteOutcome;

use crate::to_storage_err;

/// Insert a new profile, stamping both timestamps with `now`.
pub fn insert_profile(
    conn: &Connection,
    profile: &ProfileDocument,
    now: Timestamp,
) -> PersonaResult<VersionedProfile> {
    if profile_exists(conn, &profile.id)? {
        return Err(ValidationError::DuplicateIdentifier {
            field: "id".to_string(),
            id: profile.id.clone(),
        }
        .into());
    }
    let document = encode_fields(&profile.fields)?;
    conn.execute(
        "INSERT INTO profiles (id, document, creation_ts, last_update_ts, revision)
         VALUES (?1, ?2, ?3, ?3, 1)",
        params![profile.id, document, now],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let mut stored = profile.clone();
    stored.creation_ts = now;
    stored.last_update_ts = now;
    Ok(VersionedProfile {
        profile: stored,
        revision: 1,
    })
}

/// Load a profile with its revision. `None` when it does not exist.
pub fn get_profile(conn: &Connection, id: &str) -> PersonaResult<Option<VersionedProfile>> {
    let row = conn
        .query_row(
            "SELECT document, creation_ts, last_update_ts, revision FROM profiles WHERE id = ?1",
            params![id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            },
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    let Some((document, creation_ts, last_update_ts, revision)) = row else {
        return Ok(None);
    };
    Ok(Some(VersionedProfile {
        profile: ProfileDocument {
            id: id.to_string(),
            creation_ts,
            last_update_ts,
            fields: decode_fields(id, &document)?,
        },
        revision,
    }))
}

/// Replace the stored document when its revision still equals
/// `expected_revision`.
///
/// The creation timestamp is kept. The new update timestamp is `now`, but
/// never earlier than the previous one.
pub fn replace_profile(
    conn: &Connection,
    profile: &ProfileDocument,
    expected_revision: i64,
    now: Timestamp,
) -> PersonaResult<WriteOutcome> {
    let current = conn
        .query_row(
            "SELECT creation_ts, last_update_ts, revision FROM profiles WHERE id = ?1",
            params![profile.id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            },
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    let Some((creation_ts, previous_update_ts, revision)) = current else {
        return Ok(WriteOutcome::Missing);
    };
    if revision != expected_revision {
        return Ok(WriteOutcome::Stale);
    }

    let last_update_ts = now.max(previous_update_ts).max(creation_ts);
    let document = encode_fields(&profile.fields)?;
    let updated = conn
        .execute(
            "UPDATE profiles
             SET document = ?1, last_update_ts = ?2, revision = revision + 1
             WHERE id = ?3 AND revision = ?4",
            params![document, last_update_ts, profile.id, expected_revision],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    if updated == 0 {
        return Ok(WriteOutcome::Stale);
    }

    let mut stored = profile.clone();
    stored.creation_ts = creation_ts;
    stored.last_update_ts = last_update_ts;
    Ok(WriteOutcome::Applied(VersionedProfile {
        profile: stored,
        revision: expected_revision + 1,
    }))
}

/// Delete a profile row. Returns false when there was none.
pub fn delete_profile(conn: &Connection, id: &str) -> PersonaResult<bool> {
    let deleted = conn
        .execute("DELETE FROM profiles WHERE id = ?1", params![id])
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(deleted > 0)
}

/// True when a row for `id` exists.
pub fn profile_exists(conn: &Connection, id: &str) -> PersonaResult<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM profiles WHERE id = ?1)",
        params![id],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Number of stored profiles.
pub fn count_profiles(conn: &Connection) -> PersonaResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM profiles", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as usize)
}

fn encode_fields(fields: &Document) -> PersonaResult<String> {
    serde_json::to_string(fields).map_err(|e| to_storage_err(e.to_string()))
}

fn decode_fields(id: &str, document: &str) -> PersonaResult<Document> {
    serde_json::from_str(document).map_err(|e| {
        StorageError::CorruptDocument {
            id: id.to_string(),
            details: e.to_string(),
        }
        .into()
    })
}
