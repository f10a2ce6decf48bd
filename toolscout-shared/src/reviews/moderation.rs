//! Review moderation state machine
//!
//! ```text
//!            approve
//!          ┌─────────► approved
//! pending ─┤
//!          └─────────► rejected
//!            reject
//! ```
//!
//! Only administrators may moderate. `pending` is never a target, and a review
//! that already left `pending` cannot change status again. Approving an
//! approved review is a [`Transition::Reconfirm`]: nothing is written, but the
//! tool's rating is recomputed, which repairs an aggregate left stale by a
//! failed recompute.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::auth::{authorization::require_admin, middleware::AuthContext};
use crate::error::{ServiceError, ServiceResult};
use crate::models::review::ReviewStatus;

/// An administrator's verdict on a pending review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationDecision {
    Approved,
    Rejected,
}

impl ModerationDecision {
    /// Status the review moves to
    pub fn target(&self) -> ReviewStatus {
        match self {
            ModerationDecision::Approved => ReviewStatus::Approved,
            ModerationDecision::Rejected => ReviewStatus::Rejected,
        }
    }

    /// Whether the decision changes the tool's approved set
    pub fn triggers_recompute(&self) -> bool {
        matches!(self, ModerationDecision::Approved)
    }
}

impl TryFrom<ReviewStatus> for ModerationDecision {
    type Error = ServiceError;

    fn try_from(status: ReviewStatus) -> Result<Self, Self::Error> {
        match status {
            ReviewStatus::Approved => Ok(ModerationDecision::Approved),
            ReviewStatus::Rejected => Ok(ModerationDecision::Rejected),
            ReviewStatus::Pending => Err(ServiceError::invalid(
                "Status must be 'approved' or 'rejected'",
            )),
        }
    }
}

impl fmt::Display for ModerationDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.target().as_str())
    }
}

/// Fails `Forbidden` unless the actor is an administrator
pub fn authorize(actor: &AuthContext) -> ServiceResult<()> {
    require_admin(actor).map_err(|_| ServiceError::Forbidden("Admin access required".to_string()))
}

/// Outcome of a valid moderation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Write the new status
    Move(ReviewStatus),

    /// Status already matches an approval; only the recompute runs
    Reconfirm,
}

/// Validates `current → decision`
pub fn transition(current: ReviewStatus, decision: ModerationDecision) -> ServiceResult<Transition> {
    let target = decision.target();

    if current.can_transition_to(target) {
        return Ok(Transition::Move(target));
    }

    if current == target && decision.triggers_recompute() {
        return Ok(Transition::Reconfirm);
    }

    Err(ServiceError::invalid(format!(
        "Review is already {} and cannot be moderated again",
        current
    )))
}
