//! Admin-only account management. The router wraps these routes in both the
//! JWT and admin-gate middleware.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::database::models::{User, UserDraft, UserUpdate};
use crate::database::repository::Repository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::pipeline::steps::user_save_pipeline;
use crate::query::ListParams;
use crate::services::users;
use crate::AppState;

/// GET /api/v1/users
pub async fn list(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Vec<serde_json::Value>> {
    let params = ListParams::from_query(&raw).clamp_limit(state.config.query.max_limit);
    let repo = Repository::<User>::new("users", state.pool.clone())?;
    Ok(ApiResponse::list(repo.list(params).await?))
}

/// GET /api/v1/users/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<User> {
    Ok(ApiResponse::success(find_user(&state, id).await?))
}

/// POST /api/v1/users
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<UserDraft>,
) -> ApiResult<User> {
    let mut draft = input;
    user_save_pipeline().run(&mut draft).await?;
    let user = users::create(&state.pool, &draft).await?;
    Ok(ApiResponse::created(user))
}

/// PUT /api/v1/users/:id
///
/// Password is optional here; when absent the existing credential stands.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UserUpdate>,
) -> ApiResult<User> {
    find_user(&state, id).await?;

    let password_hash = match &input.password {
        Some(password) if password.len() < 6 => {
            return Err(ApiError::validation("Password must be at least 6 characters"));
        }
        Some(password) => Some(crate::auth::hash_password(password)?),
        None => None,
    };

    let user = users::update(&state.pool, id, &input, password_hash.as_deref()).await?;
    Ok(ApiResponse::success(user))
}

/// DELETE /api/v1/users/:id
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    find_user(&state, id).await?;
    users::delete(&state.pool, id).await?;
    Ok(ApiResponse::success(serde_json::json!({})))
}

async fn find_user(state: &AppState, id: Uuid) -> Result<User, ApiError> {
    let repo = Repository::<User>::new("users", state.pool.clone())?;
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User not found with id of {}", id)))
}
