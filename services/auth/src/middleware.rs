//! Request gates for bearer token validation and role checks
//!
//! `auth_middleware` resolves the caller from the `Authorization: Bearer`
//! header and stores an [`AuthUser`] in the request extensions.
//! `require_role` is layered inside it on routes that need a specific role.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::{debug, warn};

use crate::{AuthState, error::AuthError, models::AuthUser, models::Role};

/// Extract and validate the bearer token
pub async fn auth_middleware(
    State(state): State<AuthState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AuthError::Unauthenticated)?;

    let claims = state.jwt_service.validate(bearer.token()).map_err(|e| {
        warn!("Rejected bearer token: {}", e);
        AuthError::Unauthenticated
    })?;

    debug!("Authenticated {} (id {})", claims.sub, claims.id);
    req.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(req).await)
}

/// Reject callers whose token does not carry `role`
///
/// Must run after [`auth_middleware`].
pub async fn require_role(
    State(role): State<Role>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = current_user(&req).ok_or(AuthError::Unauthenticated)?;

    if !user.has_role(&role) {
        warn!("{} lacks role {}", user.username, role);
        return Err(AuthError::InsufficientPermissions);
    }

    Ok(next.run(req).await)
}

/// Extract the authenticated user from the request extensions
pub fn current_user(req: &Request) -> Option<&AuthUser> {
    req.extensions().get::<AuthUser>()
}
