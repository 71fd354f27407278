//! Login route

use axum::{Form, Json, Router, extract::State, response::IntoResponse, routing::post};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::{AuthState, error::AuthError, jwt::TokenSubject};

/// Form-encoded login request
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Response for token generation
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Create the router for the authentication routes
pub fn create_router(state: AuthState) -> Router {
    Router::new()
        .route("/token", post(login))
        .with_state(state)
}

/// Exchange a username and password for a bearer token
pub async fn login(
    State(state): State<AuthState>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, AuthError> {
    // Argon2 verification is CPU bound; keep it off the async workers.
    let credentials = state.credentials.clone();
    let username = form.username.clone();
    let account = tokio::task::spawn_blocking(move || credentials.verify(&username, &form.password))
        .await
        .map_err(|e| {
            error!("Password verification task failed: {}", e);
            AuthError::Internal
        })?;

    let Some(account) = account else {
        warn!("Failed login for {}", form.username);
        return Err(AuthError::InvalidCredentials);
    };

    let access_token = state
        .jwt_service
        .issue(
            &TokenSubject::from(&account),
            Some(state.jwt_service.access_token_ttl()),
        )
        .map_err(|e| {
            error!("Failed to issue access token: {}", e);
            AuthError::Internal
        })?;

    info!("Issued access token for {}", account.username);

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        credentials::{CredentialStore, hash_password},
        jwt::{JwtConfig, JwtService},
        models::{Account, Role},
    };
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    fn state() -> AuthState {
        let credentials = CredentialStore::from_accounts(vec![Account {
            id: 1,
            username: "john".to_string(),
            full_name: "John Smith".to_string(),
            password_hash: hash_password("1234").unwrap(),
            roles: vec![Role::employee()],
        }])
        .unwrap();

        let jwt_service = JwtService::new(JwtConfig {
            secret: "login-secret".to_string(),
            access_token_expiry: 1800,
        })
        .unwrap();

        AuthState::new(credentials, jwt_service)
    }

    fn login_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/token")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_login_issues_bearer_token() {
        let state = state();
        let app = create_router(state.clone());

        let response = app
            .oneshot(login_request("username=john&password=1234"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let token: TokenResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(token.token_type, "bearer");

        let claims = state.jwt_service.validate(&token.access_token).unwrap();
        assert_eq!(claims.sub, "john");
        assert_eq!(claims.id, 1);
        assert_eq!(claims.name, "John Smith");
        assert_eq!(claims.roles, vec![Role::employee()]);
        assert_eq!(claims.exp - claims.iat, 1800);
    }

    #[tokio::test]
    async fn test_login_failure_is_unauthorized_with_challenge() {
        let app = create_router(state());

        for body in ["username=john&password=wrong", "username=nobody&password=1234"] {
            let response = app.clone().oneshot(login_request(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
                "Bearer"
            );
        }
    }

    #[tokio::test]
    async fn test_missing_field_is_rejected() {
        let app = create_router(state());
        let response = app.oneshot(login_request("username=john")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_failed_logins_by_others_do_not_block_the_owner() {
        let app = create_router(state());

        for _ in 0..10 {
            let response = app
                .clone()
                .oneshot(login_request("username=john&password=guess"))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        let response = app
            .oneshot(login_request("username=john&password=1234"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
