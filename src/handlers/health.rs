use axum::extract::State;
use serde_json::{json, Value};

use crate::database::pool;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

/// GET /
pub async fn index() -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

/// GET /health
///
/// Liveness plus a database round trip.
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    pool::health_check(&state.pool)
        .await
        .map_err(|e| {
            tracing::error!("database health check failed: {}", e);
            ApiError::service_unavailable("Database unavailable")
        })?;

    Ok(ApiResponse::success(json!({ "status": "healthy" })))
}
