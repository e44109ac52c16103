//! Location history sub-store.
//!
//! Holds the history of at most one selected parcel. Every remote call takes
//! a [`SelectionTicket`](crate::state::SelectionTicket) before it is issued;
//! its result is committed only if the same parcel is still selected and the
//! selection has not been swapped in between. Stale results are dropped.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parcel_console_core::{LocationId, ParcelId};
use tracing::{debug, info, instrument};

use crate::api::{NewLocation, ParcelBackend};
use crate::error::ConsoleError;
use crate::models::{LocationEvent, LocationHistory, Parcel};
use crate::state::Shared;

/// View over the selected parcel and its cached location history.
pub struct LocationHistoryStore<B> {
    shared: Arc<Shared<B>>,
}

impl<B> Clone for LocationHistoryStore<B> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<B: ParcelBackend> LocationHistoryStore<B> {
    pub(crate) const fn new(shared: Arc<Shared<B>>) -> Self {
        Self { shared }
    }

    /// Select `parcel`. Its history is unloaded until [`refresh`](Self::refresh).
    ///
    /// Any request still in flight for the previous selection is orphaned.
    pub async fn select(&self, parcel: Parcel) {
        let id = parcel.id();
        self.shared.state.write().await.select(parcel);
        debug!(parcel_id = %id, "Parcel selected");
    }

    /// Clear the selection and discard its cached history.
    pub async fn deselect(&self) {
        self.shared.state.write().await.clear_selection();
        debug!("Selection cleared");
    }

    /// The selected parcel, carrying its cached history.
    pub async fn selected(&self) -> Option<Parcel> {
        let state = self.shared.state.read().await;
        state.selection.as_ref().map(|selection| {
            let mut parcel = selection.parcel.clone();
            parcel.set_location_history(selection.history.clone());
            parcel
        })
    }

    /// Cached history of the selected parcel, or `None` with no selection.
    pub async fn history(&self) -> Option<LocationHistory> {
        let state = self.shared.state.read().await;
        state
            .selection
            .as_ref()
            .map(|selection| selection.history.clone())
    }

    /// Fetch the full history of `parcel_id` and, if it is still the
    /// selected parcel, replace the cached history with it.
    ///
    /// The fetched events are returned either way.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::ServiceUnavailable` if the remote call fails;
    /// the cached history is unchanged.
    #[instrument(skip(self))]
    pub async fn refresh(&self, parcel_id: ParcelId) -> Result<Vec<LocationEvent>, ConsoleError> {
        let ticket = self.shared.state.read().await.ticket();

        let events = self.shared.backend.list_locations(parcel_id).await?;

        let committed = self
            .shared
            .state
            .write()
            .await
            .commit_history(ticket, parcel_id, |history| {
                *history = LocationHistory::Loaded(events.clone());
            });

        if committed {
            debug!(count = events.len(), "Location history replaced");
        } else {
            info!(parcel_id = %parcel_id, "Discarding location history for a stale selection");
        }

        Ok(events)
    }

    /// Record a new location for `parcel_id` and append the confirmed event
    /// to the cached history without refetching.
    ///
    /// # Errors
    ///
    /// - `ConsoleError::Validation` if `description` is blank or `timestamp`
    ///   is missing; no request is sent
    /// - `ConsoleError::ServiceUnavailable` if the remote call fails
    #[instrument(skip(self, description))]
    pub async fn add(
        &self,
        parcel_id: ParcelId,
        description: &str,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<LocationEvent, ConsoleError> {
        if description.trim().is_empty() {
            return Err(ConsoleError::Validation(
                "location description is required".to_string(),
            ));
        }
        let Some(timestamp) = timestamp else {
            return Err(ConsoleError::Validation(
                "location timestamp is required".to_string(),
            ));
        };

        let ticket = self.shared.state.read().await.ticket();

        let request = NewLocation {
            description: description.to_string(),
            timestamp,
        };
        let event = self.shared.backend.add_location(parcel_id, &request).await?;

        let committed = self
            .shared
            .state
            .write()
            .await
            .commit_history(ticket, parcel_id, |history| history.push(event.clone()));

        if committed {
            debug!(location_id = %event.id, "Location appended");
        } else {
            info!(location_id = %event.id, "Selection changed, not caching new location");
        }

        Ok(event)
    }

    /// Delete a location entry and drop it from the selected parcel's
    /// cached history.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::ServiceUnavailable` if the remote delete fails;
    /// the cached history is unchanged.
    #[instrument(skip(self))]
    pub async fn remove(&self, location_id: LocationId) -> Result<(), ConsoleError> {
        let ticket = self.shared.state.read().await.ticket();

        self.shared.backend.delete_location(location_id).await?;

        let Some(target) = ticket.selected else {
            return Ok(());
        };

        let mut removed = false;
        let committed = self
            .shared
            .state
            .write()
            .await
            .commit_history(ticket, target, |history| {
                removed = history.remove(location_id);
            });

        if !committed {
            info!(location_id = %location_id, "Selection changed, not updating cached history");
        } else if removed {
            debug!(location_id = %location_id, "Location removed");
        }

        Ok(())
    }
}
