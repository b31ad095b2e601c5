//! Trust filters, strategies and queries.

use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::rating::{RatingEvent, RatingField};
use super::Timestamp;
use crate::errors::{TrustError, ValidationError};

/// Constraint on one string attribute of a rating event.
///
/// A value written as `/expr/` is a regular expression that must match the
/// whole attribute; anything else must match exactly.
#[derive(Debug, Clone)]
pub enum IdFilter {
    Exact(String),
    Pattern(Regex),
}

impl IdFilter {
    pub fn exact(value: impl Into<String>) -> Self {
        Self::Exact(value.into())
    }

    /// Parse a filter value; `/regex/` becomes a pattern filter.
    pub fn parse(field: &str, value: &str) -> Result<Self, ValidationError> {
        if value.len() >= 2 && value.starts_with('/') && value.ends_with('/') {
            let inner = &value[1..value.len() - 1];
            let regex = Regex::new(&format!("^(?:{inner})$")).map_err(|e| {
                ValidationError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("bad pattern: {e}"),
                }
            })?;
            Ok(Self::Pattern(regex))
        } else {
            Ok(Self::Exact(value.to_string()))
        }
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self, Self::Pattern(_))
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Exact(expected) => expected == value,
            Self::Pattern(regex) => regex.is_match(value),
        }
    }
}

/// Optional constraints on rating events. Unset constraints match anything;
/// a set constraint never matches an event that lacks the attribute.
#[derive(Debug, Clone, Default)]
pub struct TrustFilter {
    pub source_id: Option<IdFilter>,
    pub target_id: Option<IdFilter>,
    pub relationship: Option<IdFilter>,
    pub app_id: Option<IdFilter>,
    pub community_id: Option<IdFilter>,
    pub task_type_id: Option<IdFilter>,
    pub task_id: Option<IdFilter>,
    pub report_from: Option<Timestamp>,
    pub report_to: Option<Timestamp>,
}

impl TrustFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter on ratings received by `target_id`.
    pub fn for_target(target_id: impl Into<String>) -> Self {
        Self::new().with(RatingField::TargetId, IdFilter::exact(target_id))
    }

    pub fn with(mut self, field: RatingField, filter: IdFilter) -> Self {
        *self.slot_mut(field) = Some(filter);
        self
    }

    pub fn reported_between(mut self, from: Option<Timestamp>, to: Option<Timestamp>) -> Self {
        self.report_from = from;
        self.report_to = to;
        self
    }

    pub fn get(&self, field: RatingField) -> Option<&IdFilter> {
        match field {
            RatingField::SourceId => self.source_id.as_ref(),
            RatingField::TargetId => self.target_id.as_ref(),
            RatingField::Relationship => self.relationship.as_ref(),
            RatingField::AppId => self.app_id.as_ref(),
            RatingField::CommunityId => self.community_id.as_ref(),
            RatingField::TaskTypeId => self.task_type_id.as_ref(),
            RatingField::TaskId => self.task_id.as_ref(),
        }
    }

    fn slot_mut(&mut self, field: RatingField) -> &mut Option<IdFilter> {
        match field {
            RatingField::SourceId => &mut self.source_id,
            RatingField::TargetId => &mut self.target_id,
            RatingField::Relationship => &mut self.relationship,
            RatingField::AppId => &mut self.app_id,
            RatingField::CommunityId => &mut self.community_id,
            RatingField::TaskTypeId => &mut self.task_type_id,
            RatingField::TaskId => &mut self.task_id,
        }
    }

    /// Every set string constraint, in field order.
    pub fn constraints(&self) -> impl Iterator<Item = (RatingField, &IdFilter)> {
        RatingField::ALL
            .into_iter()
            .filter_map(move |field| self.get(field).map(|f| (field, f)))
    }

    pub fn has_patterns(&self) -> bool {
        self.constraints().any(|(_, f)| f.is_pattern())
    }

    /// True when every constraint holds for `event`.
    pub fn matches(&self, event: &RatingEvent) -> bool {
        let strings_match = self.constraints().all(|(field, filter)| {
            event
                .field(field)
                .map(|value| filter.matches(value))
                .unwrap_or(false)
        });
        strings_match
            && self.report_from.map_or(true, |from| event.report_time >= from)
            && self.report_to.map_or(true, |to| event.report_time <= to)
    }
}

/// How a set of ratings is reduced to one trust score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrustStrategy {
    Maximum,
    Minimum,
    Average,
    Median,
    RecencyBased,
}

impl TrustStrategy {
    pub const ALL: [TrustStrategy; 5] = [
        Self::Maximum,
        Self::Minimum,
        Self::Average,
        Self::Median,
        Self::RecencyBased,
    ];

    /// Wire name, e.g. `RECENCY_BASED`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Maximum => "MAXIMUM",
            Self::Minimum => "MINIMUM",
            Self::Average => "AVERAGE",
            Self::Median => "MEDIAN",
            Self::RecencyBased => "RECENCY_BASED",
        }
    }
}

impl std::fmt::Display for TrustStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrustStrategy {
    type Err = TrustError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TrustError::InvalidStrategy {
                name: s.to_string(),
            })
    }
}

/// A trust calculation request. A missing strategy is rejected at
/// evaluation time.
#[derive(Debug, Clone, Default)]
pub struct TrustQuery {
    pub filter: TrustFilter,
    pub strategy: Option<TrustStrategy>,
}

impl TrustQuery {
    pub fn new(filter: TrustFilter, strategy: TrustStrategy) -> Self {
        Self {
            filter,
            strategy: Some(strategy),
        }
    }
}
