//! HTTP client for the remote parcel service.

use std::sync::Arc;

use parcel_console_core::{LocationId, ParcelId, ParcelStatus};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use url::Url;

use super::types::{
    AuthenticateRequest, AuthenticateResponse, NewLocation, NewParcel, Registration,
    RegistrationBody, StatusUpdate, confirmed_status,
};
use super::{ApiError, ParcelBackend};
use crate::config::ConsoleConfig;
use crate::models::{DirectoryUser, LocationEvent, Parcel};

/// Parcel service API client.
///
/// Cheap to clone; clones share the HTTP connection pool and the installed
/// bearer token.
#[derive(Clone)]
pub struct ParcelApiClient {
    inner: Arc<ParcelApiClientInner>,
}

struct ParcelApiClientInner {
    client: reqwest::Client,
    base_url: String,
    /// Bearer credential, attached to every request when present
    token: RwLock<Option<SecretString>>,
}

impl ParcelApiClient {
    /// Create a new client from console configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ConsoleConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(ParcelApiClientInner {
                client: builder.build()?,
                base_url: config.base().to_string(),
                token: RwLock::new(config.token.clone()),
            }),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    // =========================================================================
    // Credential
    // =========================================================================

    /// Install the bearer token used for subsequent requests.
    pub async fn set_token(&self, token: SecretString) {
        *self.inner.token.write().await = Some(token);
    }

    /// Drop the bearer token.
    pub async fn clear_token(&self) {
        *self.inner.token.write().await = None;
    }

    /// Check if a bearer token is installed.
    pub async fn has_token(&self) -> bool {
        self.inner.token.read().await.is_some()
    }

    // =========================================================================
    // Auth endpoints
    // =========================================================================

    /// Exchange a username and password for a bearer token.
    ///
    /// The token is returned, not installed; see [`crate::auth::login`].
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for rejected credentials, or any
    /// other `ApiError` on transport failure.
    #[instrument(skip(self, username, password), fields(username = %username))]
    pub async fn authenticate(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<SecretString, ApiError> {
        let body = AuthenticateRequest {
            username,
            password: password.expose_secret(),
        };
        let response = self
            .request(Method::POST, "/api/v1/auth/authenticate")
            .await?
            .json(&body)
            .send()
            .await?;

        let auth: AuthenticateResponse = Self::handle_json(response).await?;
        Ok(SecretString::from(auth.token))
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Conflict` if the email is already registered.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let body = RegistrationBody {
            firstname: &registration.firstname,
            lastname: &registration.lastname,
            email: &registration.email,
            username: &registration.username,
            password: registration.password.expose_secret(),
        };
        let response = self
            .request(Method::POST, "/api/v1/auth/register")
            .await?
            .json(&body)
            .send()
            .await?;

        Self::handle_empty(response).await
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(Url::parse(&format!("{}{path}", self.inner.base_url))?)
    }

    /// Start a request, attaching the bearer token if one is installed.
    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path)?;
        Ok(self.authorize(self.inner.client.request(method, url)).await)
    }

    async fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.inner.token.read().await.as_ref() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Handle a response carrying a JSON body.
    async fn handle_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        if response.status().is_success() {
            return response
                .json()
                .await
                .map_err(|e| ApiError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(Self::parse_error(response).await)
    }

    /// Handle a response whose body (if any) is ignored.
    async fn handle_empty(response: Response) -> Result<(), ApiError> {
        if response.status().is_success() {
            return Ok(());
        }

        Err(Self::parse_error(response).await)
    }

    /// Map a non-success response to an `ApiError`.
    async fn parse_error(response: Response) -> ApiError {
        let status = response.status();
        let path = response.url().path().to_string();

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized,
            StatusCode::NOT_FOUND => ApiError::NotFound(path),
            StatusCode::CONFLICT => ApiError::Conflict(
                response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Conflict".to_string()),
            ),
            _ => ApiError::Status {
                status: status.as_u16(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string()),
            },
        }
    }
}

impl ParcelBackend for ParcelApiClient {
    #[instrument(skip(self))]
    async fn list_parcels(&self) -> Result<Vec<Parcel>, ApiError> {
        let response = self.request(Method::GET, "/api/parcels").await?.send().await?;
        let parcels: Vec<Parcel> = Self::handle_json(response).await?;
        debug!(count = parcels.len(), "Fetched parcels");
        Ok(parcels)
    }

    #[instrument(skip(self))]
    async fn find_by_tracking_number(&self, tracking_number: &str) -> Result<Parcel, ApiError> {
        let path = format!(
            "/api/parcels/findByTrackingNumber/{}",
            urlencoding::encode(tracking_number)
        );
        let response = self.request(Method::GET, &path).await?.send().await?;
        Self::handle_json(response).await
    }

    #[instrument(skip(self, parcel), fields(tracking_number = %parcel.tracking_number))]
    async fn create_parcel(&self, parcel: &NewParcel) -> Result<Parcel, ApiError> {
        let response = self
            .request(Method::POST, "/api/parcels/save")
            .await?
            .json(parcel)
            .send()
            .await?;
        Self::handle_json(response).await
    }

    #[instrument(skip(self))]
    async fn delete_parcel(&self, id: ParcelId) -> Result<(), ApiError> {
        let response = self
            .request(Method::DELETE, &format!("/api/parcels/{id}"))
            .await?
            .send()
            .await?;
        Self::handle_empty(response).await
    }

    #[instrument(skip(self, status), fields(status = %status))]
    async fn update_status(
        &self,
        id: ParcelId,
        status: &ParcelStatus,
    ) -> Result<Option<ParcelStatus>, ApiError> {
        let response = self
            .request(Method::PUT, &format!("/api/parcels/{id}/updateStatus"))
            .await?
            .json(&StatusUpdate { status })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::parse_error(response).await);
        }

        let body = response.text().await?;
        Ok(confirmed_status(&body))
    }

    #[instrument(skip(self))]
    async fn list_locations(&self, parcel_id: ParcelId) -> Result<Vec<LocationEvent>, ApiError> {
        let response = self
            .request(Method::GET, &format!("/api/parcels/{parcel_id}/locationHistory"))
            .await?
            .send()
            .await?;
        Self::handle_json(response).await
    }

    #[instrument(skip(self, location))]
    async fn add_location(
        &self,
        parcel_id: ParcelId,
        location: &NewLocation,
    ) -> Result<LocationEvent, ApiError> {
        let mut url = self.url("/api/locations")?;
        url.query_pairs_mut()
            .append_pair("parcelId", &parcel_id.to_string());

        let response = self
            .authorize(self.inner.client.post(url))
            .await
            .json(location)
            .send()
            .await?;
        Self::handle_json(response).await
    }

    #[instrument(skip(self))]
    async fn delete_location(&self, id: LocationId) -> Result<(), ApiError> {
        let response = self
            .request(Method::DELETE, &format!("/api/locations/{id}"))
            .await?
            .send()
            .await?;
        Self::handle_empty(response).await
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<DirectoryUser>, ApiError> {
        let response = self.request(Method::GET, "/api/v1/auth").await?.send().await?;
        Self::handle_json(response).await
    }
}

impl std::fmt::Debug for ParcelApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParcelApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}
