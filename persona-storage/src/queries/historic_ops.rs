//! Append and range-query the historic snapshot log.

use rusqlite::{params, Connection};

use persona_core::errors::{PersonaResult, StorageError};
use persona_core::models::{
    HistoricQuery, HistoricSnapshot, Page, ProfileDocument, SortOrder, Timestamp,
};

use crate::to_storage_err;

/// Insert one snapshot row.
pub fn append_snapshot(
    conn: &Connection,
    profile_id: &str,
    from: Timestamp,
    to: Timestamp,
    profile: &ProfileDocument,
) -> PersonaResult<()> {
    let snapshot = serde_json::to_string(profile).map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "INSERT INTO historic_profiles (profile_id, from_ts, to_ts, snapshot)
         VALUES (?1, ?2, ?3, ?4)",
        params![profile_id, from, to, snapshot],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// One page of the snapshots whose `[from, to]` window lies inside the
/// query bounds, sorted by `from` (insertion order breaks ties).
pub fn query_snapshots(
    conn: &Connection,
    query: &HistoricQuery,
) -> PersonaResult<Page<HistoricSnapshot>> {
    let (from, to) = query.bounds();
    let total: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM historic_profiles
             WHERE profile_id = ?1 AND from_ts >= ?2 AND to_ts <= ?3",
            params![query.profile_id, from, to],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let total = total as usize;

    if query.offset >= total || query.limit == 0 {
        return Ok(Page {
            offset: query.offset,
            total,
            items: Vec::new(),
        });
    }

    let direction = match query.order {
        SortOrder::Ascending => "ASC",
        SortOrder::Descending => "DESC",
    };
    let sql = format!(
        "SELECT seq, from_ts, to_ts, snapshot FROM historic_profiles
         WHERE profile_id = ?1 AND from_ts >= ?2 AND to_ts <= ?3
         ORDER BY from_ts {direction}, seq {direction}
         LIMIT ?4 OFFSET ?5"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(
            params![
                query.profile_id,
                from,
                to,
                query.limit as i64,
                query.offset as i64
            ],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut items = Vec::new();
    for row in rows {
        let (seq, from, to, snapshot) = row.map_err(|e| to_storage_err(e.to_string()))?;
        let profile: ProfileDocument =
            serde_json::from_str(&snapshot).map_err(|e| StorageError::CorruptDocument {
                id: format!("{}@{seq}", query.profile_id),
                details: e.to_string(),
            })?;
        items.push(HistoricSnapshot { from, to, profile });
    }

    Ok(Page {
        offset: query.offset,
        total,
        items,
    })
}

/// Remove the whole history of one profile.
pub fn delete_snapshots(conn: &Connection, profile_id: &str) -> PersonaResult<usize> {
    conn.execute(
        "DELETE FROM historic_profiles WHERE profile_id = ?1",
        params![profile_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
