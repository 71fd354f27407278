//! Authentication and authorization errors

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Error type for the login route and the request gates
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Missing, invalid or expired token
    #[error("Could not validate credentials")]
    Unauthenticated,

    /// Valid token without the required role
    #[error("Insufficient permissions")]
    InsufficientPermissions,

    /// Login with an unknown username or a wrong password
    #[error("Incorrect username or password")]
    InvalidCredentials,

    /// Internal server error
    #[error("Internal server error")]
    Internal,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Unauthenticated | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AuthError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string(),
        }));

        match self {
            AuthError::Unauthenticated | AuthError::InvalidCredentials => {
                (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}
