//! JWT service for token generation and validation
//!
//! Tokens are signed with HS256 using a shared secret. They are stateless:
//! nothing is stored server-side and a token stays usable until it expires.

use anyhow::Result;
use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::models::{Account, Role};

/// Lifetime used when the caller does not pass one
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// Upper bound accepted for a configured access token lifetime
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret for signing and verifying tokens
    pub secret: String,
    /// Access token expiration time in seconds (default: 30 minutes)
    pub access_token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET_KEY`: Secret used to sign tokens
    /// - `JWT_ACCESS_TOKEN_EXPIRY`: Access token expiry in seconds (default: 1800)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("JWT_SECRET_KEY")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET_KEY environment variable not set"))?;

        let raw_expiry = std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "1800".to_string()); // 30 minutes
        let access_token_expiry: u64 = raw_expiry.trim().parse().map_err(|e| {
            anyhow::anyhow!("JWT_ACCESS_TOKEN_EXPIRY must be a number of seconds, got {raw_expiry:?}: {e}")
        })?;
        if access_token_expiry == 0 || access_token_expiry > MAX_TOKEN_TTL.as_secs() {
            anyhow::bail!(
                "JWT_ACCESS_TOKEN_EXPIRY must be between 1 and {} seconds, got {}",
                MAX_TOKEN_TTL.as_secs(),
                access_token_expiry
            );
        }

        Ok(JwtConfig {
            secret,
            access_token_expiry,
        })
    }
}

/// Identity and roles to embed in a new token
#[derive(Debug, Clone)]
pub struct TokenSubject {
    pub username: String,
    pub roles: Vec<Role>,
    pub id: i32,
    pub name: String,
}

impl From<&Account> for TokenSubject {
    fn from(account: &Account) -> Self {
        Self {
            username: account.username.clone(),
            roles: account.roles.clone(),
            id: account.id,
            name: account.full_name.clone(),
        }
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Username
    pub sub: String,
    /// Roles held at issuance
    pub roles: Vec<Role>,
    /// Numeric account identifier
    pub id: i32,
    /// Display name
    pub name: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
    /// Token identifier
    pub jti: Uuid,
}

/// Token failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed: {0}")]
    Malformed(String),

    #[error("failed to encode token: {0}")]
    Encoding(String),
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Result<Self> {
        if config.secret.is_empty() {
            anyhow::bail!("JWT secret must not be empty");
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        // Expiry is checked in `validate_at` with no leeway.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        })
    }

    /// Issue a signed token for `subject`, expiring after `ttl`
    pub fn issue(&self, subject: &TokenSubject, ttl: Option<Duration>) -> Result<String, TokenError> {
        self.issue_at(subject, ttl, now_secs())
    }

    fn issue_at(
        &self,
        subject: &TokenSubject,
        ttl: Option<Duration>,
        now: u64,
    ) -> Result<String, TokenError> {
        let ttl = ttl.unwrap_or(DEFAULT_TOKEN_TTL);
        let exp = now
            .checked_add(ttl.as_secs())
            .ok_or_else(|| TokenError::Encoding("token lifetime overflows the clock".to_string()))?;

        let claims = Claims {
            sub: subject.username.clone(),
            roles: subject.roles.clone(),
            id: subject.id,
            name: subject.name.clone(),
            iat: now,
            exp,
            jti: Uuid::new_v4(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            error!("Failed to encode token: {}", e);
            TokenError::Encoding(e.to_string())
        })
    }

    /// Validate a token and return the claims
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, now_secs())
    }

    /// Validate a token against the given clock reading
    ///
    /// A token is expired once `now >= exp`.
    pub fn validate_at(&self, token: &str, now: u64) -> Result<Claims, TokenError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    _ => TokenError::Malformed(e.to_string()),
                }
            })?;

        if now >= token_data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(token_data.claims)
    }

    /// Get the access token expiry
    pub fn access_token_ttl(&self) -> Duration {
        Duration::from_secs(self.config.access_token_expiry)
    }
}

fn now_secs() -> u64 {
    Utc::now().timestamp().max(0) as u64
}
