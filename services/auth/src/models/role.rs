//! Role tags

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse permission tag gating access to endpoints
///
/// Roles are opaque strings; the two used by the dashboard have
/// constructors of their own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub const MANAGER: &'static str = "manager";
    pub const EMPLOYEE: &'static str = "employee";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn manager() -> Self {
        Self::new(Self::MANAGER)
    }

    pub fn employee() -> Self {
        Self::new(Self::EMPLOYEE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}
