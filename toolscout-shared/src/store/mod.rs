//! Storage abstraction
//!
//! The catalog is persisted through three narrow traits, one per record kind.
//! [`CatalogStore`] bundles them into the single store value that is built at
//! startup and handed to every component that needs it.
//!
//! # Backends
//!
//! - [`PgStore`]: PostgreSQL via `sqlx`
//! - [`InMemoryStore`]: `HashMap`/`Vec` behind a `tokio::sync::RwLock`, used
//!   by the test suites and for running the API without a database
//!
//! The traits are deliberately dumb: no validation, no cross-record knowledge.
//! Review queries never join users or tools; callers merge display names
//! with [`UserStore::user_names`] and [`ToolStore::tool_names`].

mod memory;
mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    pagination::PageRequest,
    review::{NewReview, Review, ReviewFilter, StatusUpdate},
    tool::{CreateTool, RatingAggregate, Tool, UpdateTool},
    user::{CreateUser, User},
};

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated (e.g. duplicate email)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// User account persistence
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user; fails with [`StoreError::Conflict`] on a duplicate email
    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Display names for the given ids; unknown ids are absent from the map
    async fn user_names(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, StoreError>;
}

/// Tool persistence
#[async_trait]
pub trait ToolStore: Send + Sync {
    /// Inserts a tool with `avg_rating = 0.0` and `review_count = 0`
    async fn create_tool(&self, data: CreateTool) -> Result<Tool, StoreError>;

    async fn find_tool(&self, id: Uuid) -> Result<Option<Tool>, StoreError>;

    /// Writes the present fields; returns None if the tool doesn't exist
    async fn update_tool(&self, id: Uuid, data: UpdateTool) -> Result<Option<Tool>, StoreError>;

    /// Deletes the tool row only; returns false if it didn't exist
    async fn delete_tool(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Display names for the given ids; unknown ids are absent from the map
    async fn tool_names(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, StoreError>;

    /// Overwrites the derived rating fields
    ///
    /// Returns false when no tool matched; that is not an error.
    async fn set_rating_aggregate(
        &self,
        id: Uuid,
        aggregate: RatingAggregate,
    ) -> Result<bool, StoreError>;
}

/// Review persistence
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Inserts a `pending` review with both timestamps set to now
    async fn insert_review(&self, data: NewReview) -> Result<Review, StoreError>;

    async fn find_review(&self, id: Uuid) -> Result<Option<Review>, StoreError>;

    async fn find_review_by_tool_and_user(
        &self,
        tool_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Review>, StoreError>;

    /// One page of matching reviews in insertion order, plus the total match count
    async fn list_reviews(
        &self,
        filter: ReviewFilter,
        page: PageRequest,
    ) -> Result<(Vec<Review>, u64), StoreError>;

    /// Unconditional status write; returns None if the review doesn't exist
    async fn update_review_status(
        &self,
        id: Uuid,
        update: StatusUpdate,
    ) -> Result<Option<Review>, StoreError>;

    /// Deletes every review of a tool; returns the number removed
    async fn delete_reviews_for_tool(&self, tool_id: Uuid) -> Result<u64, StoreError>;

    /// `(sum of ratings, count)` over the tool's approved reviews
    async fn approved_rating_totals(&self, tool_id: Uuid) -> Result<(i64, i64), StoreError>;
}

/// The complete store handed to services and the API state
#[async_trait]
pub trait CatalogStore: UserStore + ToolStore + ReviewStore {
    /// Verifies the backend is reachable
    async fn ping(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Conflict("Email already registered".to_string());
        assert_eq!(err.to_string(), "Conflict: Email already registered");

        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(err.to_string().starts_with("Database error"));
    }
}
