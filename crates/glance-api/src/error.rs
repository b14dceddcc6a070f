use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use glance_core::GlanceError;
use thiserror::Error;

use crate::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Request timed out")]
    Timeout,

    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Glance(#[from] GlanceError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Glance(err) => match err {
                GlanceError::Validation(_) => StatusCode::BAD_REQUEST,
                GlanceError::NotFound(_) => StatusCode::NOT_FOUND,
                GlanceError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                GlanceError::UpstreamConfig(_)
                | GlanceError::Upstream(_)
                | GlanceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Glance(GlanceError::UpstreamConfig(service)) => {
                tracing::error!("Integration not configured: {}", service);
                format!("{} configuration error", service)
            }
            ApiError::Glance(GlanceError::RateLimited(source)) => {
                tracing::warn!("Rate limited by {}", source);
                "Rate limit exceeded. Please try again later.".to_string()
            }
            ApiError::Glance(GlanceError::Upstream(e)) => {
                tracing::error!("Upstream error: {}", e);
                "Internal server error".to_string()
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                "Internal server error".to_string()
            }
            ApiError::Timeout => {
                tracing::warn!("Request exceeded the server timeout");
                self.to_string()
            }
            ApiError::Glance(GlanceError::Storage(e)) => {
                tracing::error!("Storage error: {}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
