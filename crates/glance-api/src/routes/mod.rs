pub mod cache;
pub mod chat;
pub mod health;
pub mod posts;
pub mod summary;

use axum::{
    extract::{rejection::QueryRejection, Query},
    BoxError,
};

use crate::error::ApiError;

/// Per-route fallback for unsupported methods
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

/// Required `handle` query parameter
pub(crate) fn require_handle(handle: Option<String>) -> Result<String, ApiError> {
    handle
        .filter(|h| !h.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Handle is required".to_string()))
}

/// Unwrap a query extractor, reporting a malformed query string as a 400
pub(crate) fn parse_query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(query)| query)
        .map_err(|e| ApiError::BadRequest(format!("Invalid query string: {}", e.body_text())))
}

/// Error handler for the timeout layer
pub async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::Internal(err.to_string())
    }
}
