//! Request and response bodies of the remote parcel service.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use parcel_console_core::{ParcelStatus, Role, UserId};

use crate::models::location::timestamp;

/// Body of `POST /api/parcels/save`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewParcel {
    pub tracking_number: String,
    pub destination: String,
    pub status: ParcelStatus,
    pub user: OwnerRef,
}

/// Owner reference sent with a new parcel: id and role only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerRef {
    pub id: UserId,
    pub role: Role,
}

/// Body of `PUT /api/parcels/{id}/updateStatus`.
#[derive(Debug, Serialize)]
pub(crate) struct StatusUpdate<'a> {
    pub status: &'a ParcelStatus,
}

/// Body of `POST /api/locations?parcelId={id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewLocation {
    #[serde(rename = "locationDescription")]
    pub description: String,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// Body of `POST /api/v1/auth/authenticate`.
#[derive(Serialize)]
pub(crate) struct AuthenticateRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response of `POST /api/v1/auth/authenticate`.
#[derive(Deserialize)]
pub(crate) struct AuthenticateResponse {
    pub token: String,
}

/// Body of `POST /api/v1/auth/register`.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct Registration {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub username: String,
    pub password: SecretString,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("firstname", &self.firstname)
            .field("lastname", &self.lastname)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Serialize)]
pub(crate) struct RegistrationBody<'a> {
    pub firstname: &'a str,
    pub lastname: &'a str,
    pub email: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

/// Extracts the confirmed status from an update-status response body.
///
/// The service answers with an empty body, a bare JSON string, or an object
/// carrying `status` (e.g. the updated parcel).
pub(crate) fn confirmed_status(body: &str) -> Option<ParcelStatus> {
    if body.trim().is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(body).ok()? {
        serde_json::Value::String(status) => Some(ParcelStatus::new(status)),
        serde_json::Value::Object(fields) => fields
            .get("status")
            .and_then(serde_json::Value::as_str)
            .map(ParcelStatus::new),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_new_parcel_body_shape() {
        let body = NewParcel {
            tracking_number: "TN1".to_string(),
            destination: "Oslo".to_string(),
            status: ParcelStatus::new("Pending"),
            user: OwnerRef {
                id: UserId::new(4),
                role: Role::new("USER"),
            },
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "trackingNumber": "TN1",
                "destination": "Oslo",
                "status": "Pending",
                "user": { "id": 4, "role": "USER" }
            })
        );
    }

    #[test]
    fn test_new_location_body_shape() {
        let body = NewLocation {
            description: "Warehouse A".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 2, 14, 0, 0).unwrap(),
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "locationDescription": "Warehouse A",
                "timestamp": "2024-05-02T14:00:00Z"
            })
        );
    }

    #[test]
    fn test_confirmed_status_shapes() {
        assert_eq!(confirmed_status(""), None);
        assert_eq!(confirmed_status("\"Done\""), Some(ParcelStatus::new("Done")));
        assert_eq!(
            confirmed_status(r#"{"id":1,"status":"In Progress"}"#),
            Some(ParcelStatus::new("In Progress"))
        );
        assert_eq!(confirmed_status("Parcel status updated"), None);
    }

    #[test]
    fn test_registration_debug_redacts_password() {
        let registration = Registration {
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            email: "ada@depot.io".to_string(),
            username: "ada".to_string(),
            password: SecretString::from("hunter2-but-longer"),
        };

        let debug_output = format!("{registration:?}");
        assert!(debug_output.contains("ada@depot.io"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("hunter2-but-longer"));
    }
}
