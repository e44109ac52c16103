//! User directory lookup.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::api::ParcelBackend;
use crate::error::ConsoleError;
use crate::models::UserRef;
use crate::state::Shared;

/// Resolves owner emails against the remote user directory.
///
/// Nothing is cached: every lookup reads the full directory.
pub struct UserDirectory<B> {
    shared: Arc<Shared<B>>,
}

impl<B: ParcelBackend> UserDirectory<B> {
    pub(crate) const fn new(shared: Arc<Shared<B>>) -> Self {
        Self { shared }
    }

    /// Find the user whose email equals `email` exactly (case-sensitive).
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::ServiceUnavailable` if the directory cannot be
    /// read. A directory without a match is `Ok(None)`.
    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRef>, ConsoleError> {
        let users = self.shared.backend.list_users().await?;
        debug!(count = users.len(), "Fetched user directory");

        Ok(users
            .iter()
            .find(|user| user.email == email)
            .map(crate::models::DirectoryUser::to_ref))
    }
}
