//! Parcel collection store.
//!
//! Owns the authoritative in-memory list of parcels. Every mutation is
//! confirm-then-apply: the remote call completes successfully before the
//! collection changes, so a failed call leaves the collection untouched.
//! Entries are addressed by id, never by position.

use std::sync::Arc;

use parcel_console_core::{ParcelId, ParcelStatus};
use tracing::{debug, info, instrument, warn};

use crate::api::{ApiError, NewParcel, OwnerRef, ParcelBackend};
use crate::directory::UserDirectory;
use crate::error::ConsoleError;
use crate::models::{Parcel, ParcelDraft};
use crate::search;
use crate::state::Shared;

/// View over the parcel collection.
pub struct ParcelStore<B> {
    shared: Arc<Shared<B>>,
}

impl<B> Clone for ParcelStore<B> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<B: ParcelBackend> ParcelStore<B> {
    pub(crate) const fn new(shared: Arc<Shared<B>>) -> Self {
        Self { shared }
    }

    /// Snapshot of the collection in arrival order.
    pub async fn parcels(&self) -> Vec<Parcel> {
        self.shared.state.read().await.parcels.clone()
    }

    /// Snapshot of one parcel.
    pub async fn get(&self, id: ParcelId) -> Option<Parcel> {
        self.shared
            .state
            .read()
            .await
            .parcels
            .iter()
            .find(|parcel| parcel.id() == id)
            .cloned()
    }

    /// Number of parcels in the collection.
    pub async fn len(&self) -> usize {
        self.shared.state.read().await.parcels.len()
    }

    /// Returns `true` if the collection is empty.
    pub async fn is_empty(&self) -> bool {
        self.shared.state.read().await.parcels.is_empty()
    }

    /// Parcels whose tracking number contains `query`, ignoring case.
    ///
    /// See [`search::filter`].
    pub async fn search(&self, query: &str) -> Vec<Parcel> {
        let state = self.shared.state.read().await;
        search::filter(&state.parcels, query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Fetch the full parcel set and replace the collection wholesale.
    ///
    /// If the selected parcel is no longer present, the selection and its
    /// cached history are discarded; otherwise the selected snapshot takes
    /// the fresh field values and keeps its history, which is also written
    /// back into the reloaded collection entry.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::ServiceUnavailable` if the remote call fails;
    /// the previous contents are kept.
    #[instrument(skip(self))]
    pub async fn load_all(&self) -> Result<Vec<Parcel>, ConsoleError> {
        let parcels = self.shared.backend.list_parcels().await?;

        let mut state = self.shared.state.write().await;
        state.parcels.clone_from(&parcels);

        if let Some(selected) = state.selected_id() {
            match parcels.iter().find(|parcel| parcel.id() == selected) {
                Some(fresh) => {
                    let state = &mut *state;
                    if let Some(selection) = state.selection.as_mut() {
                        selection.parcel = fresh.clone();
                        selection
                            .parcel
                            .set_location_history(selection.history.clone());
                        if let Some(entry) = state.parcels.iter_mut().find(|p| p.id() == selected) {
                            entry.set_location_history(selection.history.clone());
                        }
                    }
                }
                None => {
                    info!(parcel_id = %selected, "Selected parcel no longer exists, clearing selection");
                    state.clear_selection();
                }
            }
        }

        debug!(count = parcels.len(), "Parcel collection replaced");
        Ok(parcels)
    }

    /// Resolve the owner, submit the draft, and append the persisted parcel.
    ///
    /// # Errors
    ///
    /// - `ConsoleError::Validation` if the draft fails its preconditions
    /// - `ConsoleError::OwnerNotFound` if no directory user has the owner
    ///   email; no create request is sent
    /// - `ConsoleError::ServiceUnavailable` if a remote call fails
    ///
    /// The collection is unchanged on every error.
    #[instrument(skip(self, draft), fields(tracking_number = %draft.tracking_number))]
    pub async fn create(&self, draft: ParcelDraft) -> Result<Parcel, ConsoleError> {
        {
            let state = self.shared.state.read().await;
            draft.validate(&state.parcels)?;
        }

        let owner = UserDirectory::new(Arc::clone(&self.shared))
            .find_by_email(&draft.owner_email)
            .await?
            .ok_or_else(|| ConsoleError::OwnerNotFound(draft.owner_email.clone()))?;

        let request = NewParcel {
            tracking_number: draft.tracking_number,
            destination: draft.destination,
            status: draft.status,
            user: OwnerRef {
                id: owner.id,
                role: owner.role,
            },
        };

        let parcel = self.shared.backend.create_parcel(&request).await?;

        self.shared.state.write().await.parcels.push(parcel.clone());
        info!(parcel_id = %parcel.id(), "Parcel created");
        Ok(parcel)
    }

    /// Delete a parcel remotely, then remove it locally.
    ///
    /// If it was the selected parcel, the selection and its cached history
    /// are discarded too.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::ServiceUnavailable` if the remote delete fails;
    /// the collection is left intact.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ParcelId) -> Result<(), ConsoleError> {
        self.shared.backend.delete_parcel(id).await?;

        let mut state = self.shared.state.write().await;
        state.parcels.retain(|parcel| parcel.id() != id);
        if state.selected_id() == Some(id) {
            state.clear_selection();
        }

        info!(parcel_id = %id, "Parcel deleted");
        Ok(())
    }

    /// Update a parcel's status remotely, then apply the confirmed value.
    ///
    /// Only the `status` field changes; the parcel keeps its identity and
    /// position. The confirmed value is the one echoed by the service, or
    /// the requested one if the service answered with an empty body.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::ServiceUnavailable` if the remote update fails;
    /// the local status is left untouched.
    #[instrument(skip(self, status), fields(status = %status))]
    pub async fn update_status(
        &self,
        id: ParcelId,
        status: ParcelStatus,
    ) -> Result<ParcelStatus, ConsoleError> {
        let confirmed = self
            .shared
            .backend
            .update_status(id, &status)
            .await?
            .unwrap_or(status);

        let mut state = self.shared.state.write().await;
        match state.parcels.iter_mut().find(|parcel| parcel.id() == id) {
            Some(parcel) => parcel.set_status(confirmed.clone()),
            None => warn!(parcel_id = %id, "Status confirmed for a parcel not in the collection"),
        }
        if let Some(selection) = state.selection.as_mut()
            && selection.parcel.id() == id
        {
            selection.parcel.set_status(confirmed.clone());
        }

        debug!(parcel_id = %id, status = %confirmed, "Parcel status updated");
        Ok(confirmed)
    }

    /// Look a parcel up on the service by its exact tracking number.
    ///
    /// Read-only: the collection is not touched.
    ///
    /// # Errors
    ///
    /// - `ConsoleError::Validation` if `tracking_number` is blank; no request
    ///   is sent
    /// - `ConsoleError::ServiceUnavailable` for failures other than "not found"
    #[instrument(skip(self))]
    pub async fn lookup(&self, tracking_number: &str) -> Result<Option<Parcel>, ConsoleError> {
        if tracking_number.trim().is_empty() {
            return Err(ConsoleError::Validation(
                "Please enter a tracking number to search.".to_string(),
            ));
        }

        match self
            .shared
            .backend
            .find_by_tracking_number(tracking_number)
            .await
        {
            Ok(parcel) => Ok(Some(parcel)),
            Err(ApiError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
