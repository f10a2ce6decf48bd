//! In-memory implementation of the store traits.
//!
//! All records are held in a single state struct behind a `RwLock` and are
//! lost on restart. Reviews are kept in a `Vec` so listing follows insertion
//! order, like the PostgreSQL backend.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CatalogStore, ReviewStore, StoreError, ToolStore, UserStore};
use crate::models::{
    pagination::PageRequest,
    review::{NewReview, Review, ReviewFilter, ReviewStatus, StatusUpdate},
    tool::{CreateTool, RatingAggregate, Tool, UpdateTool},
    user::{CreateUser, User},
};

#[derive(Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    tools: HashMap<Uuid, Tool>,
    reviews: Vec<Review>,
}

/// In-memory catalog store.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError> {
        let mut state = self.state.write().await;

        if state
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&data.email))
        {
            return Err(StoreError::Conflict("Email already registered".to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            name: data.name,
            email: data.email,
            password_hash: data.password_hash,
            role: data.role,
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn user_names(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, StoreError> {
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.users.get(id).map(|u| (*id, u.name.clone())))
            .collect())
    }
}

#[async_trait]
impl ToolStore for InMemoryStore {
    async fn create_tool(&self, data: CreateTool) -> Result<Tool, StoreError> {
        let now = Utc::now();
        let tool = Tool {
            id: Uuid::new_v4(),
            name: data.name,
            short_description: data.short_description,
            category: data.category,
            pricing_display: data.pricing_display,
            pricing_model: data.pricing_model,
            official_url: data.official_url,
            source_url: data.source_url,
            released_ago: data.released_ago,
            votes: data.votes,
            rating_seed: data.rating_seed,
            logo_url: data.logo_url,
            avg_rating: RatingAggregate::EMPTY.avg_rating,
            review_count: RatingAggregate::EMPTY.review_count,
            created_at: now,
            updated_at: now,
        };

        let mut state = self.state.write().await;
        state.tools.insert(tool.id, tool.clone());

        Ok(tool)
    }

    async fn find_tool(&self, id: Uuid) -> Result<Option<Tool>, StoreError> {
        let state = self.state.read().await;
        Ok(state.tools.get(&id).cloned())
    }

    async fn update_tool(&self, id: Uuid, data: UpdateTool) -> Result<Option<Tool>, StoreError> {
        let mut state = self.state.write().await;
        Ok(state.tools.get_mut(&id).map(|tool| {
            data.apply_to(tool);
            tool.clone()
        }))
    }

    async fn delete_tool(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        Ok(state.tools.remove(&id).is_some())
    }

    async fn tool_names(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, StoreError> {
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.tools.get(id).map(|t| (*id, t.name.clone())))
            .collect())
    }

    async fn set_rating_aggregate(
        &self,
        id: Uuid,
        aggregate: RatingAggregate,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        match state.tools.get_mut(&id) {
            Some(tool) => {
                tool.avg_rating = aggregate.avg_rating;
                tool.review_count = aggregate.review_count;
                tool.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl ReviewStore for InMemoryStore {
    async fn insert_review(&self, data: NewReview) -> Result<Review, StoreError> {
        let now = Utc::now();
        let review = Review {
            id: Uuid::new_v4(),
            tool_id: data.tool_id,
            user_id: data.user_id,
            rating: data.rating,
            comment: data.comment,
            status: ReviewStatus::Pending,
            created_at: now,
            updated_at: now,
            moderated_by: None,
            moderation_note: None,
        };

        let mut state = self.state.write().await;
        state.reviews.push(review.clone());

        Ok(review)
    }

    async fn find_review(&self, id: Uuid) -> Result<Option<Review>, StoreError> {
        let state = self.state.read().await;
        Ok(state.reviews.iter().find(|r| r.id == id).cloned())
    }

    async fn find_review_by_tool_and_user(
        &self,
        tool_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Review>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .reviews
            .iter()
            .find(|r| r.tool_id == tool_id && r.user_id == user_id)
            .cloned())
    }

    async fn list_reviews(
        &self,
        filter: ReviewFilter,
        page: PageRequest,
    ) -> Result<(Vec<Review>, u64), StoreError> {
        let state = self.state.read().await;
        let matching: Vec<&Review> = state.reviews.iter().filter(|r| filter.matches(r)).collect();
        let total = matching.len() as u64;

        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect();

        Ok((items, total))
    }

    async fn update_review_status(
        &self,
        id: Uuid,
        update: StatusUpdate,
    ) -> Result<Option<Review>, StoreError> {
        let mut state = self.state.write().await;
        Ok(state.reviews.iter_mut().find(|r| r.id == id).map(|review| {
            review.status = update.status;
            review.moderated_by = Some(update.moderated_by);
            if update.moderation_note.is_some() {
                review.moderation_note = update.moderation_note;
            }
            review.updated_at = Utc::now();
            review.clone()
        }))
    }

    async fn delete_reviews_for_tool(&self, tool_id: Uuid) -> Result<u64, StoreError> {
        let mut state = self.state.write().await;
        let before = state.reviews.len();
        state.reviews.retain(|r| r.tool_id != tool_id);
        Ok((before - state.reviews.len()) as u64)
    }

    async fn approved_rating_totals(&self, tool_id: Uuid) -> Result<(i64, i64), StoreError> {
        let state = self.state.read().await;
        Ok(state
            .reviews
            .iter()
            .filter(|r| r.tool_id == tool_id && r.status == ReviewStatus::Approved)
            .fold((0, 0), |(sum, count), r| (sum + r.rating as i64, count + 1)))
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
