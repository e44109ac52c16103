//! User directory entries.

use serde::Deserialize;

use parcel_console_core::{Role, UserId};

use super::parcel::UserRef;

/// A user as listed by the remote user directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectoryUser {
    /// Directory user id.
    pub id: UserId,
    /// Contact email, matched exactly when resolving parcel owners.
    pub email: String,
    /// Login name.
    #[serde(default)]
    pub username: Option<String>,
    /// Current role.
    pub role: Role,
}

impl DirectoryUser {
    /// Snapshot of this user for attaching to a new parcel.
    #[must_use]
    pub fn to_ref(&self) -> UserRef {
        UserRef {
            id: self.id,
            role: self.role.clone(),
            username: self.username.clone(),
        }
    }
}
