//! Administrator endpoints
//!
//! Every route here sits behind the bearer token check and the admin role
//! gate. The services repeat the role check, so calling them from elsewhere
//! cannot skip it.
//!
//! - `GET /admin/reviews?status=&page=&pageSize=` - Moderation queue
//! - `PATCH /admin/reviews/:id` - Approve or reject a pending review
//! - `POST /admin/tools` - Add a tool
//! - `PUT /admin/tools/:id` - Partial tool update
//! - `DELETE /admin/tools/:id` - Delete a tool and its reviews

use std::str::FromStr;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use toolscout_shared::{
    auth::middleware::AuthContext,
    models::{
        pagination::{PageRequest, Paged},
        review::{Review, ReviewFilter, ReviewStatus, ReviewView},
        tool::{CreateTool, Tool, UpdateTool},
    },
    reviews::{ModerationDecision, NameJoin},
};
use validator::Validate;

use super::{parse_id, PageParams};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Moderation queue query; no `status` lists every review
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewQueueParams {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Moderation request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerateReviewRequest {
    /// `approved` or `rejected`
    pub status: ReviewStatus,
    pub moderation_note: Option<String>,
}

pub async fn list_reviews(
    State(state): State<AppState>,
    params: Result<Query<ReviewQueueParams>, QueryRejection>,
) -> ApiResult<Json<Paged<ReviewView>>> {
    let Query(params) = params?;

    let filter = match params.status.as_deref() {
        Some(raw) => {
            let status = ReviewStatus::from_str(raw).map_err(ApiError::BadRequest)?;
            ReviewFilter::by_status(status)
        }
        None => ReviewFilter::default(),
    };

    let page = state
        .reviews
        .list(filter, page_request(&params)?, NameJoin::BOTH)
        .await?;

    Ok(Json(page))
}

fn page_request(params: &ReviewQueueParams) -> ApiResult<PageRequest> {
    PageParams {
        page: params.page,
        page_size: params.page_size,
    }
    .to_request()
}

/// Approving recomputes the tool's rating before the response is sent
///
/// Approving an approved review changes nothing but the recompute.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id, `pending` target, or a status change out of a terminal state
/// - `404 Not Found`: Review does not exist
pub async fn moderate_review(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    payload: Result<Json<ModerateReviewRequest>, JsonRejection>,
) -> ApiResult<Json<Review>> {
    let id = parse_id(&id, "review")?;
    let Json(req) = payload?;
    let decision = ModerationDecision::try_from(req.status)?;

    let review = state
        .reviews
        .moderate(&auth, id, decision, req.moderation_note)
        .await?;

    Ok(Json(review))
}

pub async fn create_tool(
    State(state): State<AppState>,
    auth: AuthContext,
    payload: Result<Json<CreateTool>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Tool>)> {
    let Json(req) = payload?;
    req.validate()?;

    let tool = state.tools.create(&auth, req).await?;
    Ok((StatusCode::CREATED, Json(tool)))
}

/// # Errors
///
/// - `400 Bad Request`: Malformed id or no fields present
/// - `404 Not Found`: Tool does not exist
pub async fn update_tool(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTool>, JsonRejection>,
) -> ApiResult<Json<Tool>> {
    let id = parse_id(&id, "tool")?;
    let Json(req) = payload?;
    req.validate()?;

    let tool = state.tools.update(&auth, id, req).await?;
    Ok(Json(tool))
}

pub async fn delete_tool(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id, "tool")?;
    state.tools.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
