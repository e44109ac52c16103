//! Remote parcel service client.
//!
//! Issues CRUD requests for parcels and location entries, lists the user
//! directory, and talks to the auth endpoints. Pure request/response: no
//! retries, no caching.
//!
//! # Architecture
//!
//! - [`ParcelBackend`] is the seam the stores are generic over
//! - [`ParcelApiClient`] implements it over HTTP with `reqwest`
//! - A bearer token, when installed, is attached to every request
//!
//! # Endpoints
//!
//! | Operation | Method | Path |
//! |---|---|---|
//! | list parcels | GET | `/api/parcels` |
//! | find by tracking number | GET | `/api/parcels/findByTrackingNumber/{value}` |
//! | create parcel | POST | `/api/parcels/save` |
//! | delete parcel | DELETE | `/api/parcels/{id}` |
//! | update status | PUT | `/api/parcels/{id}/updateStatus` |
//! | list location history | GET | `/api/parcels/{id}/locationHistory` |
//! | add location | POST | `/api/locations?parcelId={id}` |
//! | delete location | DELETE | `/api/locations/{id}` |
//! | list users | GET | `/api/v1/auth` |
//! | authenticate | POST | `/api/v1/auth/authenticate` |
//! | register | POST | `/api/v1/auth/register` |

mod client;
mod types;

use std::future::Future;

pub use client::ParcelApiClient;
pub use types::{NewLocation, NewParcel, OwnerRef, Registration};

use parcel_console_core::{LocationId, ParcelId, ParcelStatus};
use thiserror::Error;

use crate::models::{DirectoryUser, LocationEvent, Parcel};

/// Errors that can occur when talking to the parcel service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service returned a non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request conflicts with existing data.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or rejected credential.
    #[error("Unauthorized")]
    Unauthorized,

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Operations of the remote parcel service used by the stores.
///
/// Implemented by [`ParcelApiClient`]; tests substitute a scripted fake.
pub trait ParcelBackend: Send + Sync {
    /// `GET /api/parcels`
    fn list_parcels(&self) -> impl Future<Output = Result<Vec<Parcel>, ApiError>> + Send;

    /// `GET /api/parcels/findByTrackingNumber/{value}`
    fn find_by_tracking_number(
        &self,
        tracking_number: &str,
    ) -> impl Future<Output = Result<Parcel, ApiError>> + Send;

    /// `POST /api/parcels/save`
    fn create_parcel(
        &self,
        parcel: &NewParcel,
    ) -> impl Future<Output = Result<Parcel, ApiError>> + Send;

    /// `DELETE /api/parcels/{id}`
    fn delete_parcel(&self, id: ParcelId) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// `PUT /api/parcels/{id}/updateStatus`
    ///
    /// Returns the status echoed by the service, if it sent one.
    fn update_status(
        &self,
        id: ParcelId,
        status: &ParcelStatus,
    ) -> impl Future<Output = Result<Option<ParcelStatus>, ApiError>> + Send;

    /// `GET /api/parcels/{id}/locationHistory`
    fn list_locations(
        &self,
        parcel_id: ParcelId,
    ) -> impl Future<Output = Result<Vec<LocationEvent>, ApiError>> + Send;

    /// `POST /api/locations?parcelId={id}`
    fn add_location(
        &self,
        parcel_id: ParcelId,
        location: &NewLocation,
    ) -> impl Future<Output = Result<LocationEvent, ApiError>> + Send;

    /// `DELETE /api/locations/{id}`
    fn delete_location(&self, id: LocationId)
    -> impl Future<Output = Result<(), ApiError>> + Send;

    /// `GET /api/v1/auth`
    fn list_users(&self) -> impl Future<Output = Result<Vec<DirectoryUser>, ApiError>> + Send;
}
