//! Scripted in-memory parcel service for unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use parcel_console_core::{LocationId, ParcelId, ParcelStatus, Role, UserId};
use tokio::sync::Notify;

use crate::api::{ApiError, NewLocation, NewParcel, ParcelBackend};
use crate::models::{DirectoryUser, LocationEvent, Parcel};

/// A directory entry.
pub fn directory_user(id: i64, email: &str, role: &str) -> DirectoryUser {
    DirectoryUser {
        id: UserId::new(id),
        email: email.to_string(),
        username: Some(email.split('@').next().unwrap_or_default().to_string()),
        role: Role::new(role),
    }
}

/// A location event with a fixed timestamp.
pub fn location(id: i64, description: &str) -> LocationEvent {
    LocationEvent {
        id: LocationId::new(id),
        description: description.to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
    }
}

#[derive(Default)]
struct FakeState {
    parcels: Vec<Parcel>,
    locations: HashMap<ParcelId, Vec<LocationEvent>>,
    users: Vec<DirectoryUser>,
    calls: HashMap<&'static str, usize>,
    failing: bool,
    fail_on: HashSet<&'static str>,
    echo: Option<ParcelStatus>,
    gates: HashMap<&'static str, Arc<Notify>>,
    next_id: i64,
}

/// In-memory [`ParcelBackend`] that records calls and fails on demand.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn with_parcels(parcels: Vec<Parcel>) -> Self {
        let backend = Self::default();
        backend.replace_parcels(parcels);
        backend
    }

    pub fn replace_parcels(&self, parcels: Vec<Parcel>) {
        let mut state = self.state.lock().unwrap();
        state.next_id = parcels.iter().map(|p| p.id().as_i64()).max().unwrap_or(0) + 100;
        state.parcels = parcels;
    }

    pub fn add_user(&self, user: DirectoryUser) {
        self.state.lock().unwrap().users.push(user);
    }

    pub fn set_locations(&self, parcel_id: ParcelId, events: Vec<LocationEvent>) {
        self.state.lock().unwrap().locations.insert(parcel_id, events);
    }

    /// Fail every call.
    pub fn set_failing(&self, failing: bool) {
        self.state.lock().unwrap().failing = failing;
    }

    /// Fail calls to one operation.
    pub fn fail_on(&self, operation: &'static str) {
        self.state.lock().unwrap().fail_on.insert(operation);
    }

    /// Status returned in the update-status response body.
    pub fn echo_status(&self, status: Option<ParcelStatus>) {
        self.state.lock().unwrap().echo = status;
    }

    /// Hold responses of `operation` until `gate` is notified.
    pub fn hold(&self, operation: &'static str, gate: Arc<Notify>) {
        self.state.lock().unwrap().gates.insert(operation, gate);
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .get(operation)
            .copied()
            .unwrap_or(0)
    }

    fn record(&self, operation: &'static str) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(operation).or_insert(0) += 1;
        if state.failing || state.fail_on.contains(operation) {
            return Err(ApiError::Status {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        Ok(())
    }

    async fn wait_gate(&self, operation: &str) {
        let gate = self.state.lock().unwrap().gates.get(operation).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    fn next_id(&self) -> i64 {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        state.next_id
    }
}

impl ParcelBackend for FakeBackend {
    async fn list_parcels(&self) -> Result<Vec<Parcel>, ApiError> {
        self.record("list_parcels")?;
        Ok(self.state.lock().unwrap().parcels.clone())
    }

    async fn find_by_tracking_number(&self, tracking_number: &str) -> Result<Parcel, ApiError> {
        self.record("find_by_tracking_number")?;
        self.state
            .lock()
            .unwrap()
            .parcels
            .iter()
            .find(|p| p.tracking_number() == tracking_number)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(tracking_number.to_string()))
    }

    async fn create_parcel(&self, parcel: &NewParcel) -> Result<Parcel, ApiError> {
        self.record("create_parcel")?;
        let id = self.next_id();
        let created: Parcel = serde_json::from_value(serde_json::json!({
            "id": id,
            "trackingNumber": parcel.tracking_number,
            "destination": parcel.destination,
            "status": parcel.status,
            "user": { "id": parcel.user.id, "role": parcel.user.role },
        }))
        .unwrap();
        self.state.lock().unwrap().parcels.push(created.clone());
        Ok(created)
    }

    async fn delete_parcel(&self, id: ParcelId) -> Result<(), ApiError> {
        self.record("delete_parcel")?;
        self.state.lock().unwrap().parcels.retain(|p| p.id() != id);
        Ok(())
    }

    async fn update_status(
        &self,
        id: ParcelId,
        status: &ParcelStatus,
    ) -> Result<Option<ParcelStatus>, ApiError> {
        self.record("update_status")?;
        let mut state = self.state.lock().unwrap();
        let echo = state.echo.clone();
        if let Some(parcel) = state.parcels.iter_mut().find(|p| p.id() == id) {
            parcel.set_status(echo.clone().unwrap_or_else(|| status.clone()));
        }
        Ok(echo)
    }

    async fn list_locations(&self, parcel_id: ParcelId) -> Result<Vec<LocationEvent>, ApiError> {
        self.record("list_locations")?;
        self.wait_gate("list_locations").await;
        Ok(self
            .state
            .lock()
            .unwrap()
            .locations
            .get(&parcel_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_location(
        &self,
        parcel_id: ParcelId,
        location: &NewLocation,
    ) -> Result<LocationEvent, ApiError> {
        self.record("add_location")?;
        self.wait_gate("add_location").await;
        let event = LocationEvent {
            id: LocationId::new(self.next_id()),
            description: location.description.clone(),
            timestamp: location.timestamp,
        };
        self.state
            .lock()
            .unwrap()
            .locations
            .entry(parcel_id)
            .or_default()
            .push(event.clone());
        Ok(event)
    }

    async fn delete_location(&self, id: LocationId) -> Result<(), ApiError> {
        self.record("delete_location")?;
        self.wait_gate("delete_location").await;
        for events in self.state.lock().unwrap().locations.values_mut() {
            events.retain(|e| e.id != id);
        }
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<DirectoryUser>, ApiError> {
        self.record("list_users")?;
        Ok(self.state.lock().unwrap().users.clone())
    }
}
