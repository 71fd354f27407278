//! Credential store holding the accounts allowed to log in
//!
//! The store is built once at startup and is read-only afterwards.
//! Passwords are kept as Argon2 PHC strings.

use anyhow::{Context, Result};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use std::{collections::HashMap, path::Path};
use tracing::{info, warn};

use crate::{
    models::{Account, AccountRecord, AccountSeed, Role},
    validation::{validate_full_name, validate_roles, validate_username},
};

/// Accounts available when no roster file is configured
pub const SAMPLE_ACCOUNTS: &[AccountSeed] = &[
    AccountSeed {
        id: 0,
        username: "manager1",
        full_name: "Manager One",
        password: "managerpass",
        roles: &[Role::MANAGER],
    },
    AccountSeed {
        id: 1,
        username: "john",
        full_name: "John Smith",
        password: "1234",
        roles: &[Role::EMPLOYEE],
    },
    AccountSeed {
        id: 2,
        username: "bob",
        full_name: "Bob Wong",
        password: "1234",
        roles: &[Role::EMPLOYEE],
    },
    AccountSeed {
        id: 3,
        username: "ann",
        full_name: "Ann Li",
        password: "1234",
        roles: &[Role::EMPLOYEE],
    },
];

/// Hash a password with Argon2 and a random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Read-only table of accounts keyed by username
#[derive(Debug, Default)]
pub struct CredentialStore {
    accounts: HashMap<String, Account>,
}

impl CredentialStore {
    /// Build a store from validated accounts
    pub fn from_accounts(accounts: impl IntoIterator<Item = Account>) -> Result<Self> {
        let mut by_username = HashMap::new();
        let mut ids = HashMap::new();

        for account in accounts {
            validate_username(&account.username)
                .map_err(|e| anyhow::anyhow!("Account {:?}: {}", account.username, e))?;
            validate_full_name(&account.full_name)
                .map_err(|e| anyhow::anyhow!("Account {:?}: {}", account.username, e))?;
            validate_roles(&account.roles)
                .map_err(|e| anyhow::anyhow!("Account {:?}: {}", account.username, e))?;
            PasswordHash::new(&account.password_hash).map_err(|e| {
                anyhow::anyhow!("Account {:?}: invalid password hash: {}", account.username, e)
            })?;

            if let Some(other) = ids.insert(account.id, account.username.clone()) {
                anyhow::bail!(
                    "Accounts {:?} and {:?} share id {}",
                    other,
                    account.username,
                    account.id
                );
            }
            if by_username.contains_key(&account.username) {
                anyhow::bail!("Duplicate username {:?}", account.username);
            }

            by_username.insert(account.username.clone(), account);
        }

        Ok(Self {
            accounts: by_username,
        })
    }

    /// Build a store from plaintext seeds, hashing every password
    pub fn from_seeds(seeds: &[AccountSeed]) -> Result<Self> {
        let accounts = seeds
            .iter()
            .map(|seed| -> Result<Account> {
                Ok(Account {
                    id: seed.id,
                    username: seed.username.to_string(),
                    full_name: seed.full_name.to_string(),
                    password_hash: hash_password(seed.password)?,
                    roles: seed.roles.iter().copied().map(Role::from).collect(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_accounts(accounts)
    }

    /// Build the store holding the sample accounts
    pub fn sample() -> Result<Self> {
        warn!("Using the built-in sample accounts");
        Self::from_seeds(SAMPLE_ACCOUNTS)
    }

    /// Load a roster from a JSON file of [`AccountRecord`]s
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read accounts file {}", path.display()))?;
        let records: Vec<AccountRecord> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse accounts file {}", path.display()))?;

        let store = Self::from_accounts(records.into_iter().map(Account::from))?;
        info!("Loaded {} accounts from {}", store.account_count(), path.display());
        Ok(store)
    }

    /// Check a username and plaintext password
    ///
    /// Returns `None` for an unknown username or a wrong password.
    pub fn verify(&self, username: &str, password: &str) -> Option<Account> {
        let account = self.accounts.get(username)?;

        let parsed_hash = match PasswordHash::new(&account.password_hash) {
            Ok(hash) => hash,
            Err(e) => {
                warn!("Stored hash for {} is unreadable: {}", username, e);
                return None;
            }
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .ok()
            .map(|_| account.clone())
    }

    pub fn get(&self, username: &str) -> Option<&Account> {
        self.accounts.get(username)
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }
}
