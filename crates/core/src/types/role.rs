//! User role as reported by the user directory.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Role of a directory user (e.g. `USER`, `ADMIN`).
///
/// Kept as the raw string the directory reports so that roles added on the
/// server side pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Create a role from its directory name.
    #[must_use]
    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    /// Returns the role as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
