//! Input validation utilities for account rosters

use regex::Regex;
use std::sync::OnceLock;

use crate::models::Role;

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if username.len() < 3 {
        return Err("Username must be at least 3 characters long".to_string());
    }

    if username.len() > 32 {
        return Err("Username must be at most 32 characters long".to_string());
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err("Username can only contain letters, numbers, and underscores".to_string());
    }

    Ok(())
}

/// Validate the role tags of an account
pub fn validate_roles(roles: &[Role]) -> Result<(), String> {
    if roles.is_empty() {
        return Err("Account must hold at least one role".to_string());
    }

    static ROLE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = ROLE_REGEX
        .get_or_init(|| Regex::new(r"^[a-z][a-z0-9_-]*$").expect("Failed to compile role regex"));

    if let Some(bad) = roles.iter().find(|r| !regex.is_match(r.as_str())) {
        return Err(format!("Invalid role tag: {:?}", bad.as_str()));
    }

    Ok(())
}

/// Validate display name
pub fn validate_full_name(full_name: &str) -> Result<(), String> {
    if full_name.trim().is_empty() {
        return Err("Display name is required".to_string());
    }

    if full_name.len() > 128 {
        return Err("Display name must be at most 128 characters long".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("john").is_ok());
        assert!(validate_username("manager1").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("jo").is_err());
        assert!(validate_username("john smith").is_err());
        assert!(validate_username(&"a".repeat(33)).is_err());
    }

    #[test]
    fn test_validate_roles() {
        assert!(validate_roles(&[Role::employee()]).is_ok());
        assert!(validate_roles(&[Role::manager(), Role::employee()]).is_ok());
        assert!(validate_roles(&[]).is_err());
        assert!(validate_roles(&[Role::new("Manager")]).is_err());
        assert!(validate_roles(&[Role::new("")]).is_err());
    }

    #[test]
    fn test_validate_full_name() {
        assert!(validate_full_name("Ann Li").is_ok());
        assert!(validate_full_name("   ").is_err());
    }
}
