use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::access::{Principal, Role};
use crate::auth::{
    generate_jwt, generate_reset_token, hash_password, hash_reset_token, verify_password,
};
use crate::database::models::{User, UserDraft};
use crate::database::repository::Repository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::pipeline::steps::user_save_pipeline;
use crate::services::users;
use crate::AppState;

const RESET_TOKEN_TTL_MINUTES: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDetailsRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

/// POST /api/v1/auth/register
///
/// Self-registration covers user and publisher accounts; admins are created
/// through the admin user routes.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<UserDraft>,
) -> ApiResult<Value> {
    if input.role == Role::Admin {
        return Err(ApiError::bad_request("Cannot register as admin"));
    }
    let mut draft = input;
    user_save_pipeline().run(&mut draft).await?;
    let user = users::create(&state.pool, &draft).await?;
    token_response(&state, &user, true)
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> ApiResult<Value> {
    if input.email.is_empty() || input.password.is_empty() {
        return Err(ApiError::bad_request("Please provide an email and password"));
    }

    let user = users::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !verify_password(&input.password, &user.password) {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    token_response(&state, &user, false)
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<User> {
    let user = find_user(&state, principal).await?;
    Ok(ApiResponse::success(user))
}

/// PUT /api/v1/auth/updatedetails
pub async fn update_details(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<UpdateDetailsRequest>,
) -> ApiResult<User> {
    let user = users::update_details(&state.pool, principal.id, &input.name, &input.email).await?;
    Ok(ApiResponse::success(user))
}

/// PUT /api/v1/auth/updatepassword
pub async fn update_password(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<UpdatePasswordRequest>,
) -> ApiResult<Value> {
    let user = find_user(&state, principal).await?;
    if !verify_password(&input.current_password, &user.password) {
        return Err(ApiError::unauthorized("Password is incorrect"));
    }
    if input.new_password.len() < 6 {
        return Err(ApiError::validation("Password must be at least 6 characters"));
    }

    let hash = hash_password(&input.new_password)?;
    let user = users::update_password(&state.pool, user.id, &hash).await?;
    token_response(&state, &user, false)
}

/// POST /api/v1/auth/forgotpassword
///
/// The cleartext token goes out by mail; only its hash is stored, with a
/// short expiry.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordRequest>,
) -> ApiResult<Value> {
    // Same response whether or not the account exists
    let Some(user) = users::find_by_email(&state.pool, &input.email).await? else {
        tracing::debug!("password reset requested for unknown email");
        return Ok(ApiResponse::success(json!({ "message": "Email sent" })));
    };

    let token = generate_reset_token();
    let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
    users::set_reset_token(&state.pool, user.id, &hash_reset_token(&token), expires_at).await?;

    let text = format!(
        "You are receiving this email because you (or someone else) has requested \
         the reset of a password. Make a PUT request to: /api/v1/auth/resetpassword/{}",
        token
    );
    if let Err(e) = state.mailer.send(&user.email, "Password reset token", &text).await {
        users::clear_reset_token(&state.pool, user.id).await?;
        return Err(e.into());
    }

    Ok(ApiResponse::success(json!({ "message": "Email sent" })))
}

/// PUT /api/v1/auth/resetpassword/:resettoken
pub async fn reset_password(
    State(state): State<AppState>,
    Path(reset_token): Path<String>,
    Json(input): Json<ResetPasswordRequest>,
) -> ApiResult<Value> {
    let user = users::find_by_valid_reset_token(&state.pool, &hash_reset_token(&reset_token))
        .await?
        .ok_or_else(|| ApiError::bad_request("Invalid token"))?;

    if input.password.len() < 6 {
        return Err(ApiError::validation("Password must be at least 6 characters"));
    }

    let hash = hash_password(&input.password)?;
    let user = users::update_password(&state.pool, user.id, &hash).await?;
    users::clear_reset_token(&state.pool, user.id).await?;
    token_response(&state, &user, false)
}

async fn find_user(state: &AppState, principal: Principal) -> Result<User, ApiError> {
    let repo = Repository::<User>::new("users", state.pool.clone())?;
    repo.find_by_id(principal.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// Issue a fresh JWT for the account. Register responds 201, everything else
/// 200.
fn token_response(state: &AppState, user: &User, created: bool) -> ApiResult<Value> {
    let principal = Principal {
        id: user.id,
        role: user.role,
    };
    let token = generate_jwt(
        principal,
        &state.config.security.jwt_secret,
        state.config.security.jwt_expiry_hours,
    )?;
    let body = json!({ "token": token });
    Ok(if created {
        ApiResponse::created(body)
    } else {
        ApiResponse::success(body)
    })
}
