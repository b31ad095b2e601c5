//! Rating event storage with filter push-down.
//!
//! Exact-match constraints and the report window become SQL predicates.
//! Pattern constraints are evaluated on the returned rows, so a row limit is
//! only pushed into SQL when the filter has no patterns.

use rusqlite::types::ToSql;
use rusqlite::{params, Connection, Row};

use persona_core::errors::PersonaResult;
use persona_core::models::{IdFilter, RatingEvent, RatingField, RatingOrder, RatingQuery, TrustFilter};

use crate::to_storage_err;

const RATING_COLUMNS: &str = "source_id, target_id, relationship, app_id, community_id,
     task_type_id, task_id, rating, report_time";

fn column(field: RatingField) -> &'static str {
    match field {
        RatingField::SourceId => "source_id",
        RatingField::TargetId => "target_id",
        RatingField::Relationship => "relationship",
        RatingField::AppId => "app_id",
        RatingField::CommunityId => "community_id",
        RatingField::TaskTypeId => "task_type_id",
        RatingField::TaskId => "task_id",
    }
}

/// Insert one rating event as given, report time included.
pub fn insert_rating(conn: &Connection, event: &RatingEvent) -> PersonaResult<()> {
    conn.execute(
        &format!(
            "INSERT INTO rating_events ({RATING_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        ),
        params![
            event.source_id,
            event.target_id,
            event.relationship,
            event.app_id,
            event.community_id,
            event.task_type_id,
            event.task_id,
            event.rating,
            event.report_time,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Events matching `query.filter`. Exact filters become SQL predicates;
/// pattern filters are applied to the rows afterwards, before the limit.
pub fn find_ratings(conn: &Connection, query: &RatingQuery) -> PersonaResult<Vec<RatingEvent>> {
    let (where_clause, dyn_params) = where_clause(&query.filter);
    let order = match query.order {
        RatingOrder::Insertion => "seq ASC",
        RatingOrder::MostRecentFirst => "report_time DESC, seq DESC",
    };
    let has_patterns = query.filter.has_patterns();
    let limit = match (query.limit, has_patterns) {
        (Some(limit), false) => format!(" LIMIT {limit}"),
        _ => String::new(),
    };
    let sql = format!("SELECT {RATING_COLUMNS} FROM rating_events{where_clause} ORDER BY {order}{limit}");

    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let params_refs: Vec<&dyn ToSql> = dyn_params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt
        .query_map(params_refs.as_slice(), parse_rating_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut events = Vec::new();
    for row in rows {
        if query.limit.is_some_and(|limit| events.len() >= limit) {
            break;
        }
        let event = row.map_err(|e| to_storage_err(e.to_string()))?;
        if has_patterns && !query.filter.matches(&event) {
            continue;
        }
        events.push(event);
    }
    Ok(events)
}

/// Number of events matching `filter`.
pub fn count_ratings(conn: &Connection, filter: &TrustFilter) -> PersonaResult<usize> {
    if filter.has_patterns() {
        return Ok(find_ratings(conn, &RatingQuery::new(filter.clone()))?.len());
    }
    let (where_clause, dyn_params) = where_clause(filter);
    let params_refs: Vec<&dyn ToSql> = dyn_params.iter().map(|p| p.as_ref()).collect();
    let count: i64 = conn
        .query_row(
            &format!("SELECT COUNT(*) FROM rating_events{where_clause}"),
            params_refs.as_slice(),
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as usize)
}

/// Delete every event where `user_id` is the source or the target.
pub fn delete_ratings_referencing(conn: &Connection, user_id: &str) -> PersonaResult<usize> {
    conn.execute(
        "DELETE FROM rating_events WHERE source_id = ?1 OR target_id = ?1",
        params![user_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

fn where_clause(filter: &TrustFilter) -> (String, Vec<Box<dyn ToSql>>) {
    let mut predicates = Vec::new();
    let mut dyn_params: Vec<Box<dyn ToSql>> = Vec::new();

    for (field, constraint) in filter.constraints() {
        match constraint {
            IdFilter::Exact(value) => {
                dyn_params.push(Box::new(value.clone()));
                predicates.push(format!("{} = ?{}", column(field), dyn_params.len()));
            }
            // Evaluated after the query, but the attribute must be present.
            IdFilter::Pattern(_) => predicates.push(format!("{} IS NOT NULL", column(field))),
        }
    }
    if let Some(from) = filter.report_from {
        dyn_params.push(Box::new(from));
        predicates.push(format!("report_time >= ?{}", dyn_params.len()));
    }
    if let Some(to) = filter.report_to {
        dyn_params.push(Box::new(to));
        predicates.push(format!("report_time <= ?{}", dyn_params.len()));
    }

    if predicates.is_empty() {
        (String::new(), dyn_params)
    } else {
        (format!(" WHERE {}", predicates.join(" AND ")), dyn_params)
    }
}

fn parse_rating_row(row: &Row<'_>) -> rusqlite::Result<RatingEvent> {
    Ok(RatingEvent {
        source_id: row.get(0)?,
        target_id: row.get(1)?,
        relationship: row.get(2)?,
        app_id: row.get(3)?,
        community_id: row.get(4)?,
        task_type_id: row.get(5)?,
        task_id: row.get(6)?,
        rating: row.get(7)?,
        report_time: row.get(8)?,
    })
}
