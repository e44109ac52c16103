//! Integration tests for the parcel console.
//!
//! Each test starts a `wiremock` server standing in for the remote parcel
//! service and drives the real HTTP client against it. Mocks mounted with
//! `.expect(0)` prove that a rejected operation never reached the network.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p parcel-console-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use parcel_console::{Console, ConsoleConfig, ParcelApiClient};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A mock parcel service and a console talking to it.
pub struct TestService {
    pub server: MockServer,
    pub client: ParcelApiClient,
    pub console: Console,
}

impl TestService {
    /// Start an empty mock service.
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let config = ConsoleConfig::new(&server.uri()).unwrap();
        let client = ParcelApiClient::new(&config).unwrap();
        let console = Console::new(client.clone());
        Self {
            server,
            client,
            console,
        }
    }

    /// Start a mock service whose parcel list is `parcels`, and load it.
    pub async fn with_parcels(parcels: Value) -> Self {
        let service = Self::start().await;
        Mock::given(method("GET"))
            .and(path("/api/parcels"))
            .respond_with(ResponseTemplate::new(200).set_body_json(parcels))
            .mount(&service.server)
            .await;
        service.console.parcels().load_all().await.unwrap();
        service
    }

    /// Serve `users` as the user directory.
    pub async fn mount_directory(&self, users: Value) {
        Mock::given(method("GET"))
            .and(path("/api/v1/auth"))
            .respond_with(ResponseTemplate::new(200).set_body_json(users))
            .mount(&self.server)
            .await;
    }
}

/// A parcel as the service serializes it.
#[must_use]
pub fn parcel_json(id: i64, tracking_number: &str, status: &str) -> Value {
    json!({
        "id": id,
        "trackingNumber": tracking_number,
        "destination": "Rotterdam",
        "status": status,
        "user": { "id": 1, "email": "dispatch@depot.io", "username": "dispatch", "role": "USER" }
    })
}

/// A directory user as the service serializes it.
#[must_use]
pub fn user_json(id: i64, email: &str, role: &str) -> Value {
    json!({ "id": id, "email": email, "username": email.split('@').next(), "role": role })
}

/// A location entry as the service serializes it.
#[must_use]
pub fn location_json(id: i64, description: &str, timestamp: &str) -> Value {
    json!({ "id": id, "locationDescription": description, "timestamp": timestamp })
}
