//! Rating aggregation
//!
//! A recompute always reads the full approved set and overwrites both derived
//! fields, so it is idempotent and never drifts from stored state. Two
//! concurrent recomputes for the same tool race on the final write; either
//! result reflects a real serialization of the approvals.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::error::ServiceResult;
use crate::models::tool::RatingAggregate;
use crate::store::{CatalogStore, ReviewStore, ToolStore};

/// Writes `avg_rating` and `review_count` onto tools
#[derive(Clone)]
pub struct RatingAggregator {
    store: Arc<dyn CatalogStore>,
}

impl RatingAggregator {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Recomputes the tool's aggregate from its approved reviews
    ///
    /// A missing tool is not an error; the write matches nothing.
    pub async fn recompute(&self, tool_id: Uuid) -> ServiceResult<RatingAggregate> {
        let (sum, count) = self.store.approved_rating_totals(tool_id).await?;
        let aggregate = RatingAggregate::from_totals(sum, count);

        let matched = self.store.set_rating_aggregate(tool_id, aggregate).await?;
        if matched {
            debug!(
                tool_id = %tool_id,
                avg_rating = aggregate.avg_rating,
                review_count = aggregate.review_count,
                "Recomputed tool rating"
            );
        } else {
            debug!(tool_id = %tool_id, "Rating recompute matched no tool");
        }

        Ok(aggregate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        review::{NewReview, ReviewStatus, StatusUpdate},
        tool::{CreateTool, PricingModel},
    };
    use crate::store::InMemoryStore;

    async fn seeded() -> (Arc<InMemoryStore>, Uuid) {
        let store = Arc::new(InMemoryStore::new());
        let tool = store
            .create_tool(CreateTool {
                name: "Summarizer".to_string(),
                short_description: "Summarizes documents".to_string(),
                category: "Text".to_string(),
                pricing_display: "$10/mo".to_string(),
                pricing_model: PricingModel::Subscription,
                official_url: None,
                source_url: "https://source.example".to_string(),
                released_ago: "3 weeks ago".to_string(),
                votes: Some(12),
                rating_seed: None,
                logo_url: None,
            })
            .await
            .unwrap();
        (store, tool.id)
    }

    async fn add(store: &InMemoryStore, tool_id: Uuid, rating: i32, status: ReviewStatus) {
        let review = store
            .insert_review(NewReview {
                tool_id,
                user_id: Uuid::new_v4(),
                rating,
                comment: String::new(),
            })
            .await
            .unwrap();
        if status != ReviewStatus::Pending {
            store
                .update_review_status(
                    review.id,
                    StatusUpdate {
                        status,
                        moderated_by: Uuid::new_v4(),
                        moderation_note: None,
                    },
                )
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_recompute_counts_only_approved() {
        let (store, tool_id) = seeded().await;
        add(&store, tool_id, 5, ReviewStatus::Approved).await;
        add(&store, tool_id, 4, ReviewStatus::Approved).await;
        add(&store, tool_id, 4, ReviewStatus::Approved).await;
        add(&store, tool_id, 1, ReviewStatus::Rejected).await;
        add(&store, tool_id, 1, ReviewStatus::Pending).await;

        let aggregator = RatingAggregator::new(store.clone());
        let aggregate = aggregator.recompute(tool_id).await.unwrap();
        assert_eq!(aggregate.avg_rating, 4.33);
        assert_eq!(aggregate.review_count, 3);

        let tool = store.find_tool(tool_id).await.unwrap().unwrap();
        assert_eq!(tool.avg_rating, 4.33);
        assert_eq!(tool.review_count, 3);
    }

    #[tokio::test]
    async fn test_recompute_is_idempotent() {
        let (store, tool_id) = seeded().await;
        add(&store, tool_id, 2, ReviewStatus::Approved).await;

        let aggregator = RatingAggregator::new(store.clone());
        let first = aggregator.recompute(tool_id).await.unwrap();
        let second = aggregator.recompute(tool_id).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_recompute_empty_resets_to_zero() {
        let (store, tool_id) = seeded().await;
        store
            .set_rating_aggregate(tool_id, RatingAggregate::from_totals(9, 2))
            .await
            .unwrap();

        let aggregate = RatingAggregator::new(store.clone())
            .recompute(tool_id)
            .await
            .unwrap();
        assert_eq!(aggregate, RatingAggregate::EMPTY);
        assert_eq!(store.find_tool(tool_id).await.unwrap().unwrap().avg_rating, 0.0);
    }

    #[tokio::test]
    async fn test_recompute_missing_tool_is_ignored() {
        let store = Arc::new(InMemoryStore::new());
        let aggregate = RatingAggregator::new(store)
            .recompute(Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(aggregate, RatingAggregate::EMPTY);
    }
}
