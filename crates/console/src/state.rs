//! Console state shared by the stores.
//!
//! The parcel collection and the location-history selection live in one
//! [`ConsoleState`] behind a single lock, owned by [`Console`]. The stores are
//! narrow views over it; nothing else can reach the state. The lock is never
//! held across a remote call: every operation snapshots what it needs,
//! releases the lock, awaits the service, then re-acquires it to commit.

use std::sync::Arc;

use parcel_console_core::ParcelId;
use tokio::sync::RwLock;

use crate::api::{ParcelApiClient, ParcelBackend};
use crate::directory::UserDirectory;
use crate::models::{LocationHistory, Parcel};
use crate::status::{StatusController, StatusPolicy};
use crate::store::{LocationHistoryStore, ParcelStore};

/// Owner of the console state and entry point to its stores.
///
/// Cheap to clone; clones share state.
pub struct Console<B = ParcelApiClient> {
    shared: Arc<Shared<B>>,
}

impl<B> Clone for Console<B> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

pub(crate) struct Shared<B> {
    pub(crate) backend: B,
    pub(crate) state: RwLock<ConsoleState>,
}

impl<B: ParcelBackend> Console<B> {
    /// Create a console with an empty collection and no selection.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            shared: Arc::new(Shared {
                backend,
                state: RwLock::new(ConsoleState::default()),
            }),
        }
    }

    /// The remote service this console talks to.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.shared.backend
    }

    /// The parcel collection store.
    #[must_use]
    pub fn parcels(&self) -> ParcelStore<B> {
        ParcelStore::new(Arc::clone(&self.shared))
    }

    /// The location history sub-store.
    #[must_use]
    pub fn locations(&self) -> LocationHistoryStore<B> {
        LocationHistoryStore::new(Arc::clone(&self.shared))
    }

    /// The user directory lookup.
    #[must_use]
    pub fn directory(&self) -> UserDirectory<B> {
        UserDirectory::new(Arc::clone(&self.shared))
    }

    /// A status controller applying `policy`.
    #[must_use]
    pub fn status(&self, policy: StatusPolicy) -> StatusController<B> {
        StatusController::new(self.parcels(), policy)
    }
}

impl<B> std::fmt::Debug for Console<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}

/// The parcel currently selected for location-history inspection.
#[derive(Debug, Clone)]
pub(crate) struct Selection {
    pub(crate) parcel: Parcel,
    pub(crate) history: LocationHistory,
}

/// Selection as observed when a request was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SelectionTicket {
    pub(crate) generation: u64,
    pub(crate) selected: Option<ParcelId>,
}

#[derive(Debug, Default)]
pub(crate) struct ConsoleState {
    /// Persisted parcels in arrival order.
    pub(crate) parcels: Vec<Parcel>,
    pub(crate) selection: Option<Selection>,
    /// Bumped on every selection change.
    generation: u64,
}

impl ConsoleState {
    pub(crate) fn select(&mut self, parcel: Parcel) {
        self.generation = self.generation.wrapping_add(1);
        self.selection = Some(Selection {
            parcel,
            history: LocationHistory::NotLoaded,
        });
    }

    pub(crate) fn clear_selection(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.selection = None;
    }

    pub(crate) fn selected_id(&self) -> Option<ParcelId> {
        self.selection.as_ref().map(|selection| selection.parcel.id())
    }

    pub(crate) fn ticket(&self) -> SelectionTicket {
        SelectionTicket {
            generation: self.generation,
            selected: self.selected_id(),
        }
    }

    /// Applies `apply` to the selected parcel's history if `target` was
    /// selected when `ticket` was taken and the selection has not changed
    /// since. The result is mirrored into the collection entry.
    ///
    /// Returns `false` (and changes nothing) for a stale ticket.
    pub(crate) fn commit_history(
        &mut self,
        ticket: SelectionTicket,
        target: ParcelId,
        apply: impl FnOnce(&mut LocationHistory),
    ) -> bool {
        if ticket.generation != self.generation || ticket.selected != Some(target) {
            return false;
        }

        let Some(selection) = self.selection.as_mut() else {
            return false;
        };
        if selection.parcel.id() != target {
            return false;
        }

        apply(&mut selection.history);

        if let Some(parcel) = self.parcels.iter_mut().find(|p| p.id() == target) {
            parcel.set_location_history(selection.history.clone());
        }

        true
    }
}
