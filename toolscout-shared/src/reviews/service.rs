//! Review service
//!
//! Orchestrates the store, the moderation state machine and the rating
//! aggregator. Every public method is one logical operation made of several
//! sequential store calls; none of them holds a lock across calls.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use super::{
    aggregator::RatingAggregator,
    moderation::{self, ModerationDecision, Transition},
};
use crate::auth::middleware::AuthContext;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{
    pagination::{PageRequest, Paged},
    review::{
        NewReview, Review, ReviewFilter, ReviewStatus, ReviewView, StatusUpdate, MAX_RATING,
        MIN_RATING,
    },
};
use crate::store::{CatalogStore, ReviewStore, ToolStore, UserStore};

/// Which display names to merge into listed reviews
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NameJoin {
    pub user_names: bool,
    pub tool_names: bool,
}

impl NameJoin {
    pub const NONE: NameJoin = NameJoin {
        user_names: false,
        tool_names: false,
    };

    pub const USERS: NameJoin = NameJoin {
        user_names: true,
        tool_names: false,
    };

    pub const TOOLS: NameJoin = NameJoin {
        user_names: false,
        tool_names: true,
    };

    pub const BOTH: NameJoin = NameJoin {
        user_names: true,
        tool_names: true,
    };
}

#[derive(Clone)]
pub struct ReviewService {
    store: Arc<dyn CatalogStore>,
    aggregator: RatingAggregator,
}

impl ReviewService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            aggregator: RatingAggregator::new(store.clone()),
            store,
        }
    }

    /// Submits a review as `author`
    ///
    /// Checks, in order: the tool exists, the rating is in range, and the
    /// author has no review for this tool yet. The new review is `pending` and
    /// does not affect the tool's rating.
    pub async fn create(
        &self,
        author: &AuthContext,
        tool_id: Uuid,
        rating: i32,
        comment: String,
    ) -> ServiceResult<Review> {
        if self.store.find_tool(tool_id).await?.is_none() {
            return Err(ServiceError::not_found("Tool not found"));
        }

        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ServiceError::invalid(format!(
                "Rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }

        if self
            .store
            .find_review_by_tool_and_user(tool_id, author.user_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::AlreadyExists(
                "You have already reviewed this tool".to_string(),
            ));
        }

        let review = self
            .store
            .insert_review(NewReview {
                tool_id,
                user_id: author.user_id,
                rating,
                comment,
            })
            .await?;

        info!(
            review_id = %review.id,
            tool_id = %tool_id,
            user_id = %author.user_id,
            rating,
            "Review submitted"
        );

        Ok(review)
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<Review> {
        self.store
            .find_review(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Review not found"))
    }

    /// One page of reviews matching `filter`, with display names merged in
    ///
    /// Names are fetched in one batch per kind after the page is read. A
    /// review whose user or tool no longer exists keeps `None` for that name.
    pub async fn list(
        &self,
        filter: ReviewFilter,
        page: PageRequest,
        join: NameJoin,
    ) -> ServiceResult<Paged<ReviewView>> {
        let (reviews, total) = self.store.list_reviews(filter, page).await?;

        let user_names = if join.user_names {
            let ids = distinct(reviews.iter().map(|r| r.user_id));
            self.store.user_names(&ids).await?
        } else {
            Default::default()
        };

        let tool_names = if join.tool_names {
            let ids = distinct(reviews.iter().map(|r| r.tool_id));
            self.store.tool_names(&ids).await?
        } else {
            Default::default()
        };

        let items = reviews
            .into_iter()
            .map(|review| ReviewView {
                user_name: user_names.get(&review.user_id).cloned(),
                tool_name: tool_names.get(&review.tool_id).cloned(),
                review,
            })
            .collect();

        Ok(Paged::new(items, total, page))
    }

    /// The author's own reviews in any status, with tool names
    pub async fn list_for_author(
        &self,
        author: &AuthContext,
        page: PageRequest,
    ) -> ServiceResult<Paged<ReviewView>> {
        self.list(ReviewFilter::by_user(author.user_id), page, NameJoin::TOOLS)
            .await
    }

    /// Approved reviews of an existing tool, with author names
    pub async fn list_approved_for_tool(
        &self,
        tool_id: Uuid,
        page: PageRequest,
    ) -> ServiceResult<Paged<ReviewView>> {
        if self.store.find_tool(tool_id).await?.is_none() {
            return Err(ServiceError::not_found("Tool not found"));
        }

        let filter = ReviewFilter::by_tool(tool_id).with_status(ReviewStatus::Approved);
        self.list(filter, page, NameJoin::USERS).await
    }

    /// Moves a pending review to `approved` or `rejected`
    ///
    /// Only administrators may moderate, and only pending reviews change
    /// status. An approval recomputes the tool's aggregate before this
    /// returns. `note` is written only when present.
    ///
    /// Approving an already approved review writes nothing and reruns the
    /// recompute, so a caller can retry an approval whose recompute failed.
    pub async fn moderate(
        &self,
        actor: &AuthContext,
        review_id: Uuid,
        decision: ModerationDecision,
        note: Option<String>,
    ) -> ServiceResult<Review> {
        if let Err(err) = moderation::authorize(actor) {
            warn!(
                review_id = %review_id,
                user_id = %actor.user_id,
                "Moderation attempted without admin role"
            );
            return Err(err);
        }

        let current = self.get(review_id).await?;

        let status = match moderation::transition(current.status, decision) {
            Ok(Transition::Move(status)) => status,
            Ok(Transition::Reconfirm) => {
                let aggregate = self.aggregator.recompute(current.tool_id).await?;
                info!(
                    review_id = %review_id,
                    tool_id = %current.tool_id,
                    avg_rating = aggregate.avg_rating,
                    review_count = aggregate.review_count,
                    "Approval reconfirmed"
                );
                return Ok(current);
            }
            Err(err) => {
                warn!(
                    review_id = %review_id,
                    current = %current.status,
                    decision = %decision,
                    "Rejected status change of a moderated review"
                );
                return Err(err);
            }
        };

        let updated = self
            .store
            .update_review_status(
                review_id,
                StatusUpdate {
                    status,
                    moderated_by: actor.user_id,
                    moderation_note: note,
                },
            )
            .await?
            .ok_or_else(|| ServiceError::not_found("Review not found"))?;

        info!(
            review_id = %review_id,
            tool_id = %updated.tool_id,
            moderator = %actor.user_id,
            status = %updated.status,
            "Review moderated"
        );

        if decision.triggers_recompute() {
            self.aggregator.recompute(updated.tool_id).await?;
        }

        Ok(updated)
    }

    /// Removes every review of a tool; used when the tool is deleted
    pub async fn delete_all_for_tool(&self, tool_id: Uuid) -> ServiceResult<u64> {
        let removed = self.store.delete_reviews_for_tool(tool_id).await?;
        info!(tool_id = %tool_id, removed, "Deleted reviews for tool");
        Ok(removed)
    }
}

fn distinct(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
