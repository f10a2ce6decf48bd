//! Review model
//!
//! A review references one tool and one user by identifier only. It does not
//! own either of them, and the store does not enforce the references.
//!
//! # State Machine
//!
//! ```text
//! pending → approved
//! pending → rejected
//! ```
//!
//! Both `approved` and `rejected` are terminal. Only approved reviews count
//! toward a tool's aggregate rating.
//!
//! # Schema
//!
//! ```sql
//! CREATE TYPE review_status AS ENUM ('pending', 'approved', 'rejected');
//!
//! CREATE TABLE reviews (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     tool_id UUID NOT NULL,
//!     user_id UUID NOT NULL,
//!     rating INTEGER NOT NULL,
//!     comment TEXT NOT NULL,
//!     status review_status NOT NULL DEFAULT 'pending',
//!     moderated_by UUID,
//!     moderation_note TEXT,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lowest accepted rating
pub const MIN_RATING: i32 = 1;

/// Highest accepted rating
pub const MAX_RATING: i32 = 5;

/// Moderation status of a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "review_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    /// Submitted, awaiting moderation
    Pending,

    /// Accepted by an administrator; counts toward the tool rating
    Approved,

    /// Declined by an administrator
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }

    /// Checks if transition to target state is valid
    pub fn can_transition_to(&self, target: ReviewStatus) -> bool {
        matches!(
            (self, target),
            (ReviewStatus::Pending, ReviewStatus::Approved)
                | (ReviewStatus::Pending, ReviewStatus::Rejected)
        )
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReviewStatus::Pending),
            "approved" => Ok(ReviewStatus::Approved),
            "rejected" => Ok(ReviewStatus::Rejected),
            other => Err(format!("Unknown review status: {}", other)),
        }
    }
}

/// Stored review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub tool_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub status: ReviewStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Administrator who moderated the review (None while pending)
    pub moderated_by: Option<Uuid>,

    /// Optional note left by the moderator
    pub moderation_note: Option<String>,
}

/// Input for inserting a review; always starts `pending`
#[derive(Debug, Clone)]
pub struct NewReview {
    pub tool_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: String,
}

/// Status write performed by a moderation action
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub status: ReviewStatus,
    pub moderated_by: Uuid,

    /// Only written when present; an existing note is kept otherwise
    pub moderation_note: Option<String>,
}

/// Equality filter over reviews
///
/// Every present field must match; an empty filter matches all reviews.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewFilter {
    pub status: Option<ReviewStatus>,
    pub user_id: Option<Uuid>,
    pub tool_id: Option<Uuid>,
}

impl ReviewFilter {
    pub fn by_status(status: ReviewStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn by_user(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            ..Default::default()
        }
    }

    pub fn by_tool(tool_id: Uuid) -> Self {
        Self {
            tool_id: Some(tool_id),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: ReviewStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, review: &Review) -> bool {
        self.status.map_or(true, |s| review.status == s)
            && self.user_id.map_or(true, |u| review.user_id == u)
            && self.tool_id.map_or(true, |t| review.tool_id == t)
    }
}

/// Review with denormalized display names merged in after retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    #[serde(flatten)]
    pub review: Review,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
}
