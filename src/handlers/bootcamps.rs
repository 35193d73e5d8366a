use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::HeaderMap,
    Extension, Json,
};
use uuid::Uuid;

use crate::access::{can_mutate, can_publish_new_bootcamp, Principal, Role};
use crate::database::models::{Bootcamp, BootcampDraft, BootcampInput};
use crate::database::repository::Repository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::pipeline::steps::bootcamp_save_pipeline;
use crate::query::ListParams;
use crate::services::bootcamps;
use crate::AppState;

/// GET /api/v1/bootcamps
pub async fn list(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Vec<serde_json::Value>> {
    let params = ListParams::from_query(&raw).clamp_limit(state.config.query.max_limit);
    let repo = Repository::<Bootcamp>::new("bootcamps", state.pool.clone())?
        .array_columns(&["careers"]);
    let result = repo.list(params).await?;
    Ok(ApiResponse::list(result))
}

/// GET /api/v1/bootcamps/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Bootcamp> {
    let bootcamp = find_bootcamp(&state, id).await?;
    Ok(ApiResponse::success(bootcamp))
}

/// POST /api/v1/bootcamps
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<BootcampInput>,
) -> ApiResult<Bootcamp> {
    super::authorize_roles(&principal, &[Role::Publisher, Role::Admin])?;

    let owner_ids = bootcamps::existing_owner_ids(&state.pool).await?;
    if !can_publish_new_bootcamp(&principal, &owner_ids) {
        return Err(ApiError::forbidden(format!(
            "The user with id {} has already published a bootcamp",
            principal.id
        )));
    }

    let mut draft = BootcampDraft::new(input);
    bootcamp_save_pipeline(state.geocoder.clone())
        .run(&mut draft)
        .await?;

    let bootcamp = bootcamps::create(&state.pool, principal.id, &draft).await?;
    Ok(ApiResponse::created(bootcamp))
}

/// PUT /api/v1/bootcamps/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(input): Json<BootcampInput>,
) -> ApiResult<Bootcamp> {
    let existing = find_bootcamp(&state, id).await?;
    if !can_mutate(&principal, existing.user_id) {
        return Err(ApiError::forbidden(format!(
            "User {} is not authorized to update this bootcamp",
            principal.id
        )));
    }

    let mut draft = BootcampDraft::new(input);
    bootcamp_save_pipeline(state.geocoder.clone())
        .run(&mut draft)
        .await?;

    let bootcamp = bootcamps::update(&state.pool, id, &draft).await?;
    Ok(ApiResponse::success(bootcamp))
}

/// DELETE /api/v1/bootcamps/:id
pub async fn destroy(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    let existing = find_bootcamp(&state, id).await?;
    if !can_mutate(&principal, existing.user_id) {
        return Err(ApiError::forbidden(format!(
            "User {} is not authorized to delete this bootcamp",
            principal.id
        )));
    }

    bootcamps::delete(&state.pool, id).await?;
    Ok(ApiResponse::success(serde_json::json!({})))
}

/// GET /api/v1/bootcamps/radius/:zipcode/:distance
///
/// Distance is in miles. The zipcode is geocoded to a center point first.
pub async fn within_radius(
    State(state): State<AppState>,
    Path((zipcode, distance)): Path<(String, f64)>,
) -> ApiResult<Vec<Bootcamp>> {
    if distance <= 0.0 {
        return Err(ApiError::bad_request("Distance must be a positive number"));
    }
    let center = state.geocoder.geocode(&zipcode).await?;
    let found = bootcamps::within_radius(&state.pool, center.lat, center.lng, distance).await?;
    Ok(ApiResponse::collection(found))
}

/// PUT /api/v1/bootcamps/:id/photo
pub async fn upload_photo(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Bootcamp> {
    let existing = find_bootcamp(&state, id).await?;
    if !can_mutate(&principal, existing.user_id) {
        return Err(ApiError::forbidden(format!(
            "User {} is not authorized to update this bootcamp",
            principal.id
        )));
    }

    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::bad_request("Please upload an image file"))?;

    let filename = state.photos.save(id, content_type, &body).await?;
    let bootcamp = bootcamps::set_photo(&state.pool, id, &filename).await?;
    Ok(ApiResponse::success(bootcamp))
}

pub(super) async fn find_bootcamp(state: &AppState, id: Uuid) -> Result<Bootcamp, ApiError> {
    let repo = Repository::<Bootcamp>::new("bootcamps", state.pool.clone())?;
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Bootcamp not found with id of {}", id)))
}
