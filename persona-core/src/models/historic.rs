//! Historic snapshots and paged range queries over them.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::profile::ProfileDocument;
use super::Timestamp;
use crate::errors::ValidationError;

/// The state a profile had during `[from, to]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricSnapshot {
    pub from: Timestamp,
    pub to: Timestamp,
    pub profile: ProfileDocument,
}

/// Order of snapshots by `from` timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" | "+" => Ok(Self::Ascending),
            "desc" | "descending" | "-" => Ok(Self::Descending),
            _ => Err(ValidationError::InvalidValue {
                field: "order".to_string(),
                reason: format!("unknown sort order '{s}'"),
            }),
        }
    }
}

/// A range query over one profile's history.
///
/// A snapshot matches when its whole validity window lies inside the
/// requested bounds. Missing bounds are open.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricQuery {
    pub profile_id: String,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub order: SortOrder,
    pub offset: usize,
    pub limit: usize,
}

impl HistoricQuery {
    /// Every snapshot of `profile_id`, oldest first, default paging.
    pub fn for_profile(profile_id: impl Into<String>) -> Self {
        Self {
            profile_id: profile_id.into(),
            from: None,
            to: None,
            order: SortOrder::Ascending,
            offset: 0,
            limit: crate::config::defaults::DEFAULT_PAGE_LIMIT,
        }
    }

    pub fn from(mut self, from: Timestamp) -> Self {
        self.from = Some(from);
        self
    }

    pub fn to(mut self, to: Timestamp) -> Self {
        self.to = Some(to);
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn page(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }

    /// Effective inclusive bounds.
    pub fn bounds(&self) -> (Timestamp, Timestamp) {
        (self.from.unwrap_or(0), self.to.unwrap_or(Timestamp::MAX))
    }

    /// True when the snapshot's whole validity interval lies inside the bounds.
    pub fn contains(&self, snapshot: &HistoricSnapshot) -> bool {
        let (from, to) = self.bounds();
        snapshot.from >= from && snapshot.to <= to
    }
}

/// One page of a larger result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub offset: usize,
    pub total: usize,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// A page with no items and a zero total.
    pub fn empty(offset: usize) -> Self {
        Self {
            offset,
            total: 0,
            items: Vec::new(),
        }
    }
}
