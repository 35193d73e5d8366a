use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::query::{ListResult, Pagination};

/// Wrapper for API responses that adds the success envelope. List responses
/// additionally carry `count` and `pagination` fields.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub count: Option<usize>,
    pub pagination: Option<Pagination>,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            count: None,
            pagination: None,
            status_code: None,
        }
    }

    /// 201 Created response
    pub fn created(data: T) -> Self {
        Self {
            status_code: Some(StatusCode::CREATED),
            ..Self::success(data)
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// Collection response carrying page-window count and pagination links
    pub fn list(result: ListResult<T>) -> Self {
        Self {
            count: Some(result.count),
            pagination: Some(result.pagination),
            data: result.data,
            status_code: None,
        }
    }

    /// Collection response without pagination (e.g. radius search)
    pub fn collection(data: Vec<T>) -> Self {
        Self {
            count: Some(data.len()),
            pagination: None,
            data,
            status_code: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "Failed to serialize response data"
                    })),
                )
                    .into_response();
            }
        };

        let mut envelope = json!({ "success": true });
        if let Some(count) = self.count {
            envelope["count"] = Value::from(count);
        }
        if let Some(pagination) = &self.pagination {
            envelope["pagination"] = serde_json::to_value(pagination).unwrap_or(Value::Null);
        }
        envelope["data"] = data_value;

        (status, Json(envelope)).into_response()
    }
}

/// Return type for all handlers
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Page;

    #[test]
    fn list_response_carries_count_and_pagination() {
        let result = ListResult {
            count: 2,
            total: 30,
            pagination: Pagination::compute(1, 25, 30),
            data: vec!["a", "b"],
        };
        let response = ApiResponse::list(result);
        assert_eq!(response.count, Some(2));
        assert_eq!(
            response.pagination.as_ref().unwrap().next,
            Some(Page { page: 2, limit: 25 })
        );
    }

    #[test]
    fn single_resource_response_has_no_count() {
        let response = ApiResponse::success("x");
        assert!(response.count.is_none());
        assert!(response.pagination.is_none());
    }
}
