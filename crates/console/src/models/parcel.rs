//! Parcel domain types.

use serde::{Deserialize, Serialize};

use parcel_console_core::{ParcelId, ParcelStatus, Role, UserId};

use super::location::LocationHistory;
use crate::error::ConsoleError;

/// A shipment record, as persisted by the remote service.
///
/// Only persisted parcels exist as `Parcel` values (they always carry a
/// server-assigned id); proposed values live in a [`ParcelDraft`]. Fields are
/// read-only from outside the crate so that status changes can only flow
/// through the parcel store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parcel {
    id: ParcelId,
    tracking_number: String,
    #[serde(default)]
    destination: String,
    #[serde(default = "blank_status")]
    status: ParcelStatus,
    #[serde(rename = "user", default)]
    owner: Option<UserRef>,
    #[serde(default)]
    location_history: LocationHistory,
}

fn blank_status() -> ParcelStatus {
    ParcelStatus::new("")
}

impl Parcel {
    /// Server-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> ParcelId {
        self.id
    }

    /// User-supplied tracking number (unique).
    #[must_use]
    pub fn tracking_number(&self) -> &str {
        &self.tracking_number
    }

    /// Delivery destination.
    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Current status, as last confirmed by the server.
    #[must_use]
    pub const fn status(&self) -> &ParcelStatus {
        &self.status
    }

    /// Owner snapshot taken when the parcel was created.
    #[must_use]
    pub const fn owner(&self) -> Option<&UserRef> {
        self.owner.as_ref()
    }

    /// Cached location history.
    #[must_use]
    pub const fn location_history(&self) -> &LocationHistory {
        &self.location_history
    }

    pub(crate) fn set_status(&mut self, status: ParcelStatus) {
        self.status = status;
    }

    pub(crate) fn set_location_history(&mut self, history: LocationHistory) {
        self.location_history = history;
    }
}

#[cfg(test)]
impl Parcel {
    /// Builds a persisted parcel for tests.
    pub(crate) fn fixture(id: i64, tracking_number: &str, status: &str) -> Self {
        Self {
            id: ParcelId::new(id),
            tracking_number: tracking_number.to_string(),
            destination: "Rotterdam".to_string(),
            status: ParcelStatus::new(status),
            owner: Some(UserRef {
                id: UserId::new(1),
                role: Role::new("USER"),
                username: Some("dispatch".to_string()),
            }),
            location_history: LocationHistory::NotLoaded,
        }
    }
}

/// Snapshot reference to the user who owns a parcel.
///
/// Resolved once from the user directory when the parcel is created and
/// never re-resolved: if the user's role changes later, existing parcels
/// keep the role they were created with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    /// Directory user id.
    pub id: UserId,
    /// Role at the time of creation.
    pub role: Role,
    /// Display name, when the service includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Proposed values for a new parcel, before the server has assigned an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParcelDraft {
    /// Tracking number; must be non-blank and not already in the collection.
    pub tracking_number: String,
    /// Delivery destination.
    pub destination: String,
    /// Initial status.
    pub status: ParcelStatus,
    /// Email of the owning user, resolved through the user directory.
    pub owner_email: String,
}

impl ParcelDraft {
    /// Checks the client-side preconditions for submitting this draft.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Validation` if the tracking number or owner
    /// email is blank, or if `existing` already holds the tracking number.
    pub fn validate(&self, existing: &[Parcel]) -> Result<(), ConsoleError> {
        if self.tracking_number.trim().is_empty() {
            return Err(ConsoleError::Validation(
                "tracking number is required".to_string(),
            ));
        }

        if self.owner_email.trim().is_empty() {
            return Err(ConsoleError::Validation(
                "owner email is required".to_string(),
            ));
        }

        if existing
            .iter()
            .any(|parcel| parcel.tracking_number == self.tracking_number)
        {
            return Err(ConsoleError::Validation(format!(
                "tracking number {} already exists",
                self.tracking_number
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft(tracking_number: &str, owner_email: &str) -> ParcelDraft {
        ParcelDraft {
            tracking_number: tracking_number.to_string(),
            destination: "Lyon".to_string(),
            status: ParcelStatus::new("Pending"),
            owner_email: owner_email.to_string(),
        }
    }

    #[test]
    fn test_parcel_from_service_payload() {
        let json = serde_json::json!({
            "id": 7,
            "trackingNumber": "TN7",
            "destination": "Oslo",
            "status": "Pending",
            "user": {
                "id": 3,
                "email": "ops@depot.io",
                "username": "ops",
                "role": "ADMIN"
            },
            "locationHistory": [
                { "id": 1, "locationDescription": "Depot", "timestamp": "2024-03-01T08:30:00" }
            ]
        });

        let parcel: Parcel = serde_json::from_value(json).unwrap();
        assert_eq!(parcel.id(), ParcelId::new(7));
        assert_eq!(parcel.tracking_number(), "TN7");
        assert_eq!(parcel.owner().unwrap().role.as_str(), "ADMIN");
        assert_eq!(parcel.owner().unwrap().username.as_deref(), Some("ops"));
        assert_eq!(parcel.location_history().events().unwrap().len(), 1);
    }

    #[test]
    fn test_parcel_without_history_is_not_loaded() {
        let json = serde_json::json!({ "id": 1, "trackingNumber": "TN1", "status": "Done" });
        let parcel: Parcel = serde_json::from_value(json).unwrap();
        assert!(!parcel.location_history().is_loaded());
        assert!(parcel.owner().is_none());
    }

    #[test]
    fn test_draft_requires_tracking_number_and_email() {
        assert!(matches!(
            draft(" ", "ops@depot.io").validate(&[]),
            Err(ConsoleError::Validation(_))
        ));
        assert!(matches!(
            draft("TN1", "").validate(&[]),
            Err(ConsoleError::Validation(_))
        ));
        assert!(draft("TN1", "ops@depot.io").validate(&[]).is_ok());
    }

    #[test]
    fn test_draft_rejects_duplicate_tracking_number() {
        let existing = vec![Parcel::fixture(1, "TN1", "Pending")];
        assert!(matches!(
            draft("TN1", "ops@depot.io").validate(&existing),
            Err(ConsoleError::Validation(_))
        ));
        assert!(draft("TN2", "ops@depot.io").validate(&existing).is_ok());
    }
}
