// HTTP API error boundary
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    Validation(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    Internal(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Validation(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::Internal(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Validation(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Internal(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Uniform failure envelope: { "success": false, "error": <message> }
    pub fn to_json(&self) -> Value {
        json!({
            "success": false,
            "error": self.message(),
        })
    }
}

// Static constructors
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Conversions from module error types. Internal causes are logged here and
// never echoed verbatim to the caller.
impl From<crate::query::QueryError> for ApiError {
    fn from(err: crate::query::QueryError) -> Self {
        match err {
            crate::query::QueryError::InvalidTableName(msg)
            | crate::query::QueryError::InvalidColumn(msg) => ApiError::bad_request(msg),
            crate::query::QueryError::Execution(sqlx_err) => {
                tracing::error!("query execution error: {}", sqlx_err);
                ApiError::internal("An error occurred while processing your request")
            }
            crate::query::QueryError::Serialize(json_err) => {
                tracing::error!("row serialization error: {}", json_err);
                ApiError::internal("An error occurred while processing your request")
            }
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::not_found("Resource not found"),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ApiError::conflict("Duplicate value for a unique field")
            }
            other => {
                tracing::error!("database error: {}", other);
                ApiError::internal("Database error occurred")
            }
        }
    }
}

impl From<crate::pipeline::PipelineError> for ApiError {
    fn from(err: crate::pipeline::PipelineError) -> Self {
        match err {
            crate::pipeline::PipelineError::Validation(msg) => ApiError::validation(msg),
            crate::pipeline::PipelineError::Step { step, message } => {
                tracing::error!("save step '{}' failed: {}", step, message);
                ApiError::internal("An error occurred while saving the resource")
            }
        }
    }
}

impl From<crate::services::geocoder::GeocodeError> for ApiError {
    fn from(err: crate::services::geocoder::GeocodeError) -> Self {
        match err {
            crate::services::geocoder::GeocodeError::NoResult(addr) => {
                ApiError::bad_request(format!("Could not geocode address: {}", addr))
            }
            other => {
                tracing::error!("geocoder error: {}", other);
                ApiError::service_unavailable("Geocoding service unavailable")
            }
        }
    }
}

impl From<crate::services::photos::PhotoError> for ApiError {
    fn from(err: crate::services::photos::PhotoError) -> Self {
        match err {
            crate::services::photos::PhotoError::UnsupportedType(_)
            | crate::services::photos::PhotoError::TooLarge { .. } => {
                ApiError::bad_request(err.to_string())
            }
            crate::services::photos::PhotoError::Io(io_err) => {
                tracing::error!("photo write failed: {}", io_err);
                ApiError::internal("File upload failed")
            }
        }
    }
}

impl From<crate::services::mailer::MailError> for ApiError {
    fn from(err: crate::services::mailer::MailError) -> Self {
        tracing::error!("mailer error: {}", err);
        ApiError::internal("Email could not be sent")
    }
}

impl From<crate::auth::AuthError> for ApiError {
    fn from(err: crate::auth::AuthError) -> Self {
        match err {
            crate::auth::AuthError::InvalidToken(msg) => ApiError::unauthorized(msg),
            crate::auth::AuthError::MissingSecret => {
                tracing::error!("JWT secret not configured");
                ApiError::internal("Authentication is not configured")
            }
            crate::auth::AuthError::Hashing(msg) => {
                tracing::error!("password hashing error: {}", msg);
                ApiError::internal("An error occurred while processing credentials")
            }
            crate::auth::AuthError::Signing(msg) => {
                tracing::error!("JWT signing error: {}", msg);
                ApiError::internal("An error occurred while issuing a token")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = ApiError::not_found("No bootcamp with that id");
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn failure_envelope_shape() {
        let err = ApiError::forbidden("Not authorized to update this resource");
        let body = err.to_json();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Not authorized to update this resource");
    }

    #[test]
    fn row_not_found_becomes_not_found() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.status_code(), 404);
    }
}
