use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde_json::Value;
use uuid::Uuid;

use crate::access::{can_mutate, Principal};
use crate::database::models::{Review, ReviewInput};
use crate::database::repository::Repository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::query::ListParams;
use crate::services::reviews;
use crate::AppState;

/// GET /api/v1/reviews
pub async fn list(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Value>> {
    let params = ListParams::from_query(&raw).clamp_limit(state.config.query.max_limit);
    let repo = Repository::<Review>::new("reviews", state.pool.clone())?;
    Ok(ApiResponse::list(repo.list(params).await?))
}

/// GET /api/v1/bootcamps/:bootcamp_id/reviews
pub async fn list_for_bootcamp(
    State(state): State<AppState>,
    Path(bootcamp_id): Path<Uuid>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Value>> {
    super::bootcamps::find_bootcamp(&state, bootcamp_id).await?;
    let params = ListParams::from_query(&raw)
        .clamp_limit(state.config.query.max_limit)
        .with_filter("bootcamp_id", Value::String(bootcamp_id.to_string()));
    let repo = Repository::<Review>::new("reviews", state.pool.clone())?;
    Ok(ApiResponse::list(repo.list(params).await?))
}

/// GET /api/v1/reviews/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Review> {
    Ok(ApiResponse::success(find_review(&state, id).await?))
}

/// POST /api/v1/bootcamps/:bootcamp_id/reviews
///
/// One review per user per bootcamp; a second attempt is a 409.
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(bootcamp_id): Path<Uuid>,
    Json(input): Json<ReviewInput>,
) -> ApiResult<Review> {
    input.validate().map_err(ApiError::validation)?;

    super::bootcamps::find_bootcamp(&state, bootcamp_id).await?;
    let review = reviews::create(&state.pool, bootcamp_id, principal.id, &input).await?;
    Ok(ApiResponse::created(review))
}

/// PUT /api/v1/reviews/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(input): Json<ReviewInput>,
) -> ApiResult<Review> {
    input.validate().map_err(ApiError::validation)?;

    let existing = find_review(&state, id).await?;
    if !can_mutate(&principal, existing.user_id) {
        return Err(ApiError::forbidden(format!(
            "User {} is not authorized to update this review",
            principal.id
        )));
    }
    let review = reviews::update(&state.pool, id, &input).await?;
    Ok(ApiResponse::success(review))
}

/// DELETE /api/v1/reviews/:id
pub async fn destroy(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    let existing = find_review(&state, id).await?;
    if !can_mutate(&principal, existing.user_id) {
        return Err(ApiError::forbidden(format!(
            "User {} is not authorized to delete this review",
            principal.id
        )));
    }
    reviews::delete(&state.pool, &existing).await?;
    Ok(ApiResponse::success(serde_json::json!({})))
}

async fn find_review(state: &AppState, id: Uuid) -> Result<Review, ApiError> {
    let repo = Repository::<Review>::new("reviews", state.pool.clone())?;
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Review not found with id of {}", id)))
}
