//! Public tool endpoints
//!
//! - `GET /tools/:id` - Tool detail including `avgRating` and `reviewCount`
//! - `GET /tools/:id/reviews` - Approved reviews with author names

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use toolscout_shared::models::{pagination::Paged, review::ReviewView, tool::Tool};

use super::{parse_id, PageParams};
use crate::{app::AppState, error::ApiResult};

pub async fn get_tool(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Tool>> {
    let id = parse_id(&id, "tool")?;
    Ok(Json(state.tools.get(id).await?))
}

/// Only approved reviews are public; pending and rejected ones never appear
pub async fn list_tool_reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Paged<ReviewView>>> {
    let id = parse_id(&id, "tool")?;
    let Query(params) = params?;

    let page = state
        .reviews
        .list_approved_for_tool(id, params.to_request()?)
        .await?;

    Ok(Json(page))
}
