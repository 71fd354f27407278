//! Custom error types for the API service

use auth::error::AuthError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::dispatcher::DispatchError;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Authentication or authorization failure
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The database was unreachable or a query failed
    #[error("Upstream query failure")]
    UpstreamQueryFailure,

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Upstream(e) => {
                error!("Query dispatch failed: {}", e);
                ApiError::UpstreamQueryFailure
            }
            DispatchError::UnknownRole(role) => {
                error!("No queries mapped for role {}", role);
                ApiError::InternalServerError
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Auth(e) => return e.clone().into_response(),
            ApiError::UpstreamQueryFailure => StatusCode::BAD_GATEWAY,
            ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
