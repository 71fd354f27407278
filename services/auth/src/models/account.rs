//! Account model and the authenticated identity derived from a token

use serde::{Deserialize, Serialize};

use super::Role;
use crate::jwt::Claims;

/// Account entity held by the credential store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i32,
    pub username: String,
    pub full_name: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
}

impl Account {
    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }
}

/// Account roster entry as stored in an accounts file
///
/// `password_hash` is an Argon2 PHC string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: i32,
    pub username: String,
    pub full_name: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
}

impl From<AccountRecord> for Account {
    fn from(record: AccountRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            full_name: record.full_name,
            password_hash: record.password_hash,
            roles: record.roles,
        }
    }
}

/// Account definition with a plaintext password, hashed at startup
#[derive(Debug, Clone)]
pub struct AccountSeed {
    pub id: i32,
    pub username: &'static str,
    pub full_name: &'static str,
    pub password: &'static str,
    pub roles: &'static [&'static str],
}

/// Identity of the caller, resolved from a validated token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
    pub name: String,
    pub id: i32,
    pub roles: Vec<Role>,
}

impl AuthUser {
    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.sub,
            name: claims.name,
            id: claims.id,
            roles: claims.roles,
        }
    }
}
