//! Trust rating events.

use serde::{Deserialize, Serialize};

use super::trust::TrustFilter;
use super::Timestamp;

/// A single rating a source user gave a target user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingEvent {
    pub source_id: String,
    pub target_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_type_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    pub rating: f64,
    #[serde(default)]
    pub report_time: Timestamp,
}

impl RatingEvent {
    /// An event with no optional ids and a zero report time.
    pub fn new(source_id: impl Into<String>, target_id: impl Into<String>, rating: f64) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            relationship: None,
            app_id: None,
            community_id: None,
            task_type_id: None,
            task_id: None,
            rating,
            report_time: 0,
        }
    }

    pub fn at(mut self, report_time: Timestamp) -> Self {
        self.report_time = report_time;
        self
    }

    pub fn in_app(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    pub fn in_community(mut self, community_id: impl Into<String>) -> Self {
        self.community_id = Some(community_id.into());
        self
    }

    pub fn for_task(mut self, task_type_id: impl Into<String>, task_id: impl Into<String>) -> Self {
        self.task_type_id = Some(task_type_id.into());
        self.task_id = Some(task_id.into());
        self
    }

    pub fn with_relationship(mut self, relationship: impl Into<String>) -> Self {
        self.relationship = Some(relationship.into());
        self
    }

    /// Value of a filterable attribute, if set.
    pub fn field(&self, field: RatingField) -> Option<&str> {
        match field {
            RatingField::SourceId => Some(&self.source_id),
            RatingField::TargetId => Some(&self.target_id),
            RatingField::Relationship => self.relationship.as_deref(),
            RatingField::AppId => self.app_id.as_deref(),
            RatingField::CommunityId => self.community_id.as_deref(),
            RatingField::TaskTypeId => self.task_type_id.as_deref(),
            RatingField::TaskId => self.task_id.as_deref(),
        }
    }
}

/// String-valued attributes of a rating event that a filter can constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingField {
    SourceId,
    TargetId,
    Relationship,
    AppId,
    CommunityId,
    TaskTypeId,
    TaskId,
}

impl RatingField {
    pub const ALL: [RatingField; 7] = [
        Self::SourceId,
        Self::TargetId,
        Self::Relationship,
        Self::AppId,
        Self::CommunityId,
        Self::TaskTypeId,
        Self::TaskId,
    ];

    /// Serialized (camelCase) name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SourceId => "sourceId",
            Self::TargetId => "targetId",
            Self::Relationship => "relationship",
            Self::AppId => "appId",
            Self::CommunityId => "communityId",
            Self::TaskTypeId => "taskTypeId",
            Self::TaskId => "taskId",
        }
    }
}

/// Order in which the rating store returns events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RatingOrder {
    /// Order of insertion.
    #[default]
    Insertion,
    /// Newest report first; ties broken by newest insertion.
    MostRecentFirst,
}

/// A filtered read of rating events.
#[derive(Debug, Clone, Default)]
pub struct RatingQuery {
    pub filter: TrustFilter,
    pub order: RatingOrder,
    /// Applied after every filter, including pattern filters.
    pub limit: Option<usize>,
}

impl RatingQuery {
    pub fn new(filter: TrustFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Newest `limit` events, newest first.
    pub fn most_recent(mut self, limit: usize) -> Self {
        self.order = RatingOrder::MostRecentFirst;
        self.limit = Some(limit);
        self
    }
}
