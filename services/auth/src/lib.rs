//! Authentication and authorization for the payroll dashboard
//!
//! Holds the credential store, the bearer token service, the request gates
//! that check tokens and roles, and the `/token` login route.

pub mod credentials;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod validation;

use std::sync::Arc;

use crate::{credentials::CredentialStore, jwt::JwtService};

/// Authentication state shared across handlers and middleware
#[derive(Clone)]
pub struct AuthState {
    pub credentials: Arc<CredentialStore>,
    pub jwt_service: JwtService,
}

impl AuthState {
    pub fn new(credentials: CredentialStore, jwt_service: JwtService) -> Self {
        Self {
            credentials: Arc::new(credentials),
            jwt_service,
        }
    }
}
