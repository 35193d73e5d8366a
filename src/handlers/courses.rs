use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde_json::Value;
use uuid::Uuid;

use crate::access::{can_mutate, Principal, Role};
use crate::database::models::{Course, CourseInput};
use crate::database::repository::Repository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::query::ListParams;
use crate::services::courses;
use crate::AppState;

/// GET /api/v1/courses
pub async fn list(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Value>> {
    let params = ListParams::from_query(&raw).clamp_limit(state.config.query.max_limit);
    let repo = Repository::<Course>::new("courses", state.pool.clone())?;
    Ok(ApiResponse::list(repo.list(params).await?))
}

/// GET /api/v1/bootcamps/:bootcamp_id/courses
pub async fn list_for_bootcamp(
    State(state): State<AppState>,
    Path(bootcamp_id): Path<Uuid>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Value>> {
    super::bootcamps::find_bootcamp(&state, bootcamp_id).await?;
    let params = ListParams::from_query(&raw)
        .clamp_limit(state.config.query.max_limit)
        .with_filter("bootcamp_id", Value::String(bootcamp_id.to_string()));
    let repo = Repository::<Course>::new("courses", state.pool.clone())?;
    Ok(ApiResponse::list(repo.list(params).await?))
}

/// GET /api/v1/courses/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Course> {
    Ok(ApiResponse::success(find_course(&state, id).await?))
}

/// POST /api/v1/bootcamps/:bootcamp_id/courses
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(bootcamp_id): Path<Uuid>,
    Json(input): Json<CourseInput>,
) -> ApiResult<Course> {
    super::authorize_roles(&principal, &[Role::Publisher, Role::Admin])?;

    let bootcamp = super::bootcamps::find_bootcamp(&state, bootcamp_id).await?;
    if !can_mutate(&principal, bootcamp.user_id) {
        return Err(ApiError::forbidden(format!(
            "User {} is not authorized to add a course to bootcamp {}",
            principal.id, bootcamp_id
        )));
    }

    let course = courses::create(&state.pool, bootcamp_id, principal.id, &input).await?;
    Ok(ApiResponse::created(course))
}

/// PUT /api/v1/courses/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(input): Json<CourseInput>,
) -> ApiResult<Course> {
    let existing = find_course(&state, id).await?;
    if !can_mutate(&principal, existing.user_id) {
        return Err(ApiError::forbidden(format!(
            "User {} is not authorized to update this course",
            principal.id
        )));
    }
    let course = courses::update(&state.pool, id, &input).await?;
    Ok(ApiResponse::success(course))
}

/// DELETE /api/v1/courses/:id
pub async fn destroy(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    let existing = find_course(&state, id).await?;
    if !can_mutate(&principal, existing.user_id) {
        return Err(ApiError::forbidden(format!(
            "User {} is not authorized to delete this course",
            principal.id
        )));
    }
    courses::delete(&state.pool, &existing).await?;
    Ok(ApiResponse::success(serde_json::json!({})))
}

async fn find_course(state: &AppState, id: Uuid) -> Result<Course, ApiError> {
    let repo = Repository::<Course>::new("courses", state.pool.clone())?;
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Course not found with id of {}", id)))
}
