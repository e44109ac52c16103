//! Status controller.
//!
//! All status changes go through [`ParcelStore::update_status`]; the
//! controller only decides whether a requested target is acceptable before
//! anything is sent.

use parcel_console_core::{Lifecycle, ParcelId, ParcelStatus};
use tracing::instrument;

use crate::api::ParcelBackend;
use crate::error::ConsoleError;
use crate::store::ParcelStore;

/// Which status targets the controller accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Any string is a valid target.
    #[default]
    Permissive,
    /// Only `Pending`, `In Progress` and `Done`, moving forward. A parcel
    /// whose current status is not one of those may move to any of them.
    Lifecycle,
}

/// Applies status changes under a [`StatusPolicy`].
pub struct StatusController<B> {
    parcels: ParcelStore<B>,
    policy: StatusPolicy,
}

impl<B: ParcelBackend> StatusController<B> {
    pub(crate) const fn new(parcels: ParcelStore<B>, policy: StatusPolicy) -> Self {
        Self { parcels, policy }
    }

    /// The policy in force.
    #[must_use]
    pub const fn policy(&self) -> StatusPolicy {
        self.policy
    }

    /// Set a parcel's status and return the confirmed value.
    ///
    /// # Errors
    ///
    /// - `ConsoleError::Validation` if the policy rejects the change; no
    ///   request is sent
    /// - `ConsoleError::ServiceUnavailable` if the remote update fails
    #[instrument(skip(self, status), fields(policy = ?self.policy))]
    pub async fn set_status(
        &self,
        id: ParcelId,
        status: impl Into<ParcelStatus> + Send,
    ) -> Result<ParcelStatus, ConsoleError> {
        let status = status.into();
        if self.policy == StatusPolicy::Lifecycle {
            self.check_transition(id, &status).await?;
        }
        self.parcels.update_status(id, status).await
    }

    /// Shortcut for moving a parcel to `In Progress`.
    ///
    /// # Errors
    ///
    /// See [`set_status`](Self::set_status).
    pub async fn mark_in_progress(&self, id: ParcelId) -> Result<ParcelStatus, ConsoleError> {
        self.set_status(id, Lifecycle::InProgress).await
    }

    /// Shortcut for moving a parcel to `Done`.
    ///
    /// # Errors
    ///
    /// See [`set_status`](Self::set_status).
    pub async fn mark_done(&self, id: ParcelId) -> Result<ParcelStatus, ConsoleError> {
        self.set_status(id, Lifecycle::Done).await
    }

    async fn check_transition(&self, id: ParcelId, target: &ParcelStatus) -> Result<(), ConsoleError> {
        let Some(next) = target.lifecycle() else {
            return Err(ConsoleError::Validation(format!(
                "unknown status \"{target}\""
            )));
        };

        let Some(parcel) = self.parcels.get(id).await else {
            return Err(ConsoleError::Validation(format!(
                "parcel {id} is not loaded"
            )));
        };

        match parcel.status().lifecycle() {
            Some(current) if !current.can_transition_to(next) => {
                Err(ConsoleError::Validation(format!(
                    "cannot move a parcel from {current} to {next}"
                )))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::models::Parcel;
    use crate::state::Console;
    use crate::testing::FakeBackend;

    async fn console(status: &str) -> Console<FakeBackend> {
        let console = Console::new(FakeBackend::with_parcels(vec![Parcel::fixture(
            1, "TN1", status,
        )]));
        console.parcels().load_all().await.unwrap();
        console
    }

    #[tokio::test]
    async fn test_permissive_accepts_any_string() {
        let console = console("Pending").await;
        let controller = console.status(StatusPolicy::default());

        let confirmed = controller
            .set_status(ParcelId::new(1), "Held at customs")
            .await
            .unwrap();

        assert_eq!(confirmed.as_str(), "Held at customs");
    }

    #[tokio::test]
    async fn test_done_scenario() {
        let console = console("Pending").await;

        console
            .status(StatusPolicy::Permissive)
            .set_status(ParcelId::new(1), "Done")
            .await
            .unwrap();

        let parcels = console.parcels().parcels().await;
        assert_eq!(parcels.len(), 1);
        assert_eq!(parcels[0].id(), ParcelId::new(1));
        assert_eq!(parcels[0].tracking_number(), "TN1");
        assert_eq!(parcels[0].status().as_str(), "Done");
    }

    #[tokio::test]
    async fn test_shortcuts() {
        let console = console("Pending").await;
        let controller = console.status(StatusPolicy::Lifecycle);

        let status = controller.mark_in_progress(ParcelId::new(1)).await.unwrap();
        assert_eq!(status.as_str(), "In Progress");

        let status = controller.mark_done(ParcelId::new(1)).await.unwrap();
        assert_eq!(status.as_str(), "Done");
    }

    #[tokio::test]
    async fn test_lifecycle_rejects_backwards_without_request() {
        let console = console("Done").await;
        let controller = console.status(StatusPolicy::Lifecycle);

        let result = controller.set_status(ParcelId::new(1), "Pending").await;

        assert!(matches!(result, Err(ConsoleError::Validation(_))));
        assert_eq!(console.backend().calls("update_status"), 0);
    }

    #[tokio::test]
    async fn test_lifecycle_rejects_unknown_target() {
        let console = console("Pending").await;
        let controller = console.status(StatusPolicy::Lifecycle);

        let result = controller.set_status(ParcelId::new(1), "Lost").await;

        assert!(matches!(result, Err(ConsoleError::Validation(_))));
        assert_eq!(console.backend().calls("update_status"), 0);
    }

    #[tokio::test]
    async fn test_lifecycle_allows_leaving_unknown_status() {
        let console = console("Held at customs").await;
        let controller = console.status(StatusPolicy::Lifecycle);

        assert!(controller.set_status(ParcelId::new(1), "Pending").await.is_ok());
    }

    #[tokio::test]
    async fn test_lifecycle_requires_loaded_parcel() {
        let console = console("Pending").await;
        let controller = console.status(StatusPolicy::Lifecycle);

        let result = controller.mark_done(ParcelId::new(99)).await;
        assert!(matches!(result, Err(ConsoleError::Validation(_))));
    }
}
