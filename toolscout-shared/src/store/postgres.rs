//! PostgreSQL implementation of the store traits
//!
//! Queries are built at runtime with `sqlx::query_as` so the crate compiles
//! without a live database. The schema lives in `migrations/`.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CatalogStore, ReviewStore, StoreError, ToolStore, UserStore};
use crate::db::pool::health_check;
use crate::models::{
    pagination::PageRequest,
    review::{NewReview, Review, ReviewFilter, StatusUpdate},
    tool::{CreateTool, RatingAggregate, Tool, UpdateTool},
    user::{CreateUser, User},
};

const TOOL_COLUMNS: &str = "id, name, short_description, category, pricing_display, \
     pricing_model, official_url, source_url, released_ago, votes, rating_seed, \
     logo_url, avg_rating, review_count, created_at, updated_at";

const REVIEW_COLUMNS: &str = "id, tool_id, user_id, rating, comment, status, \
     created_at, updated_at, moderated_by, moderation_note";

/// Catalog store backed by a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, email, password_hash, role, created_at",
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(data.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Conflict("Email already registered".to_string())
            } else {
                StoreError::Database(e)
            }
        })
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role, created_at
             FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn user_names(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, StoreError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Uuid, String)> =
            sqlx::query_as("SELECT id, name FROM users WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().collect())
    }
}

#[async_trait]
impl ToolStore for PgStore {
    async fn create_tool(&self, data: CreateTool) -> Result<Tool, StoreError> {
        let sql = format!(
            "INSERT INTO tools (name, short_description, category, pricing_display,
                 pricing_model, official_url, source_url, released_ago, votes,
                 rating_seed, logo_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {}",
            TOOL_COLUMNS
        );

        let tool = sqlx::query_as::<_, Tool>(&sql)
            .bind(&data.name)
            .bind(&data.short_description)
            .bind(&data.category)
            .bind(&data.pricing_display)
            .bind(data.pricing_model)
            .bind(&data.official_url)
            .bind(&data.source_url)
            .bind(&data.released_ago)
            .bind(data.votes)
            .bind(data.rating_seed)
            .bind(&data.logo_url)
            .fetch_one(&self.pool)
            .await?;

        Ok(tool)
    }

    async fn find_tool(&self, id: Uuid) -> Result<Option<Tool>, StoreError> {
        let sql = format!("SELECT {} FROM tools WHERE id = $1", TOOL_COLUMNS);

        let tool = sqlx::query_as::<_, Tool>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(tool)
    }

    async fn update_tool(&self, id: Uuid, data: UpdateTool) -> Result<Option<Tool>, StoreError> {
        let sql = format!(
            "UPDATE tools SET
                 name = COALESCE($2, name),
                 short_description = COALESCE($3, short_description),
                 category = COALESCE($4, category),
                 pricing_display = COALESCE($5, pricing_display),
                 pricing_model = COALESCE($6, pricing_model),
                 official_url = COALESCE($7, official_url),
                 source_url = COALESCE($8, source_url),
                 released_ago = COALESCE($9, released_ago),
                 votes = COALESCE($10, votes),
                 rating_seed = COALESCE($11, rating_seed),
                 logo_url = COALESCE($12, logo_url),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            TOOL_COLUMNS
        );

        let tool = sqlx::query_as::<_, Tool>(&sql)
            .bind(id)
            .bind(data.name)
            .bind(data.short_description)
            .bind(data.category)
            .bind(data.pricing_display)
            .bind(data.pricing_model)
            .bind(data.official_url)
            .bind(data.source_url)
            .bind(data.released_ago)
            .bind(data.votes)
            .bind(data.rating_seed)
            .bind(data.logo_url)
            .fetch_optional(&self.pool)
            .await?;

        Ok(tool)
    }

    async fn delete_tool(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tools WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn tool_names(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, StoreError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Uuid, String)> =
            sqlx::query_as("SELECT id, name FROM tools WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().collect())
    }

    async fn set_rating_aggregate(
        &self,
        id: Uuid,
        aggregate: RatingAggregate,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE tools SET avg_rating = $2, review_count = $3, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(aggregate.avg_rating)
        .bind(aggregate.review_count)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ReviewStore for PgStore {
    async fn insert_review(&self, data: NewReview) -> Result<Review, StoreError> {
        let sql = format!(
            "INSERT INTO reviews (tool_id, user_id, rating, comment, status)
             VALUES ($1, $2, $3, $4, 'pending')
             RETURNING {}",
            REVIEW_COLUMNS
        );

        let review = sqlx::query_as::<_, Review>(&sql)
            .bind(data.tool_id)
            .bind(data.user_id)
            .bind(data.rating)
            .bind(&data.comment)
            .fetch_one(&self.pool)
            .await?;

        Ok(review)
    }

    async fn find_review(&self, id: Uuid) -> Result<Option<Review>, StoreError> {
        let sql = format!("SELECT {} FROM reviews WHERE id = $1", REVIEW_COLUMNS);

        let review = sqlx::query_as::<_, Review>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(review)
    }

    async fn find_review_by_tool_and_user(
        &self,
        tool_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Review>, StoreError> {
        let sql = format!(
            "SELECT {} FROM reviews WHERE tool_id = $1 AND user_id = $2 LIMIT 1",
            REVIEW_COLUMNS
        );

        let review = sqlx::query_as::<_, Review>(&sql)
            .bind(tool_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(review)
    }

    async fn list_reviews(
        &self,
        filter: ReviewFilter,
        page: PageRequest,
    ) -> Result<(Vec<Review>, u64), StoreError> {
        const WHERE: &str = "($1::review_status IS NULL OR status = $1)
             AND ($2::uuid IS NULL OR user_id = $2)
             AND ($3::uuid IS NULL OR tool_id = $3)";

        let count_sql = format!("SELECT COUNT(*) FROM reviews WHERE {}", WHERE);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(filter.status)
            .bind(filter.user_id)
            .bind(filter.tool_id)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {} FROM reviews WHERE {}
             ORDER BY created_at, id
             LIMIT $4 OFFSET $5",
            REVIEW_COLUMNS, WHERE
        );

        let reviews = sqlx::query_as::<_, Review>(&sql)
            .bind(filter.status)
            .bind(filter.user_id)
            .bind(filter.tool_id)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok((reviews, total as u64))
    }

    async fn update_review_status(
        &self,
        id: Uuid,
        update: StatusUpdate,
    ) -> Result<Option<Review>, StoreError> {
        let sql = format!(
            "UPDATE reviews SET
                 status = $2,
                 moderated_by = $3,
                 moderation_note = COALESCE($4, moderation_note),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            REVIEW_COLUMNS
        );

        let review = sqlx::query_as::<_, Review>(&sql)
            .bind(id)
            .bind(update.status)
            .bind(update.moderated_by)
            .bind(update.moderation_note)
            .fetch_optional(&self.pool)
            .await?;

        Ok(review)
    }

    async fn delete_reviews_for_tool(&self, tool_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM reviews WHERE tool_id = $1")
            .bind(tool_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn approved_rating_totals(&self, tool_id: Uuid) -> Result<(i64, i64), StoreError> {
        let totals: (i64, i64) = sqlx::query_as(
            "SELECT COALESCE(SUM(rating), 0)::BIGINT, COUNT(*)
             FROM reviews
             WHERE tool_id = $1 AND status = 'approved'",
        )
        .bind(tool_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(totals)
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        health_check(&self.pool).await?;
        Ok(())
    }
}
