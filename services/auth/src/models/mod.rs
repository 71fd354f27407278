//! Authentication models

pub mod account;
pub mod role;

// Re-export for convenience
pub use account::{Account, AccountRecord, AccountSeed, AuthUser};
pub use role::Role;
