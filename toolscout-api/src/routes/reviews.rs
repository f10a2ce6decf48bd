//! Review submission
//!
//! - `POST /reviews` - Submit a review; it starts `pending`
//! - `GET /reviews/me` - The caller's reviews in any status, with tool names

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use toolscout_shared::{
    auth::middleware::AuthContext,
    models::{pagination::Paged, review::{Review, ReviewView}},
};
use uuid::Uuid;

use super::PageParams;
use crate::{app::AppState, error::ApiResult};

/// Review submission
///
/// `rating` is range-checked by the review service after the tool lookup, so
/// a review for a missing tool is a 404 whatever its rating.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub tool_id: Uuid,
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

/// # Errors
///
/// - `400 Bad Request`: Rating outside 1-5 or malformed body
/// - `404 Not Found`: Tool does not exist
/// - `409 Conflict`: Caller already reviewed this tool
pub async fn create_review(
    State(state): State<AppState>,
    auth: AuthContext,
    payload: Result<Json<CreateReviewRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Review>)> {
    let Json(req) = payload?;

    let review = state
        .reviews
        .create(&auth, req.tool_id, req.rating, req.comment)
        .await?;

    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn list_my_reviews(
    State(state): State<AppState>,
    auth: AuthContext,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Paged<ReviewView>>> {
    let Query(params) = params?;

    let page = state
        .reviews
        .list_for_author(&auth, params.to_request()?)
        .await?;

    Ok(Json(page))
}
