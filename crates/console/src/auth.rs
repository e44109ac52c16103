//! Login and registration.
//!
//! Session persistence is left to the host: [`login`] installs the token on
//! the client and hands it back, nothing is written anywhere.

use parcel_console_core::Email;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument};

use crate::api::{ApiError, ParcelApiClient, Registration};
use crate::error::ConsoleError;

/// Authenticate and install the returned bearer token on `client`.
///
/// # Errors
///
/// - `ConsoleError::Validation` if the username or password is blank; no
///   request is sent
/// - `ConsoleError::ServiceUnavailable` if the service rejects the
///   credentials or cannot be reached
#[instrument(skip(client, password))]
pub async fn login(
    client: &ParcelApiClient,
    username: &str,
    password: &SecretString,
) -> Result<SecretString, ConsoleError> {
    if username.trim().is_empty() || password.expose_secret().is_empty() {
        return Err(ConsoleError::Validation(
            "username and password are required".to_string(),
        ));
    }

    let token = client.authenticate(username, password).await?;
    client.set_token(token.clone()).await;

    info!("Logged in");
    Ok(token)
}

/// Register a new user.
///
/// # Errors
///
/// - `ConsoleError::Validation` if a field is blank or the email is
///   malformed; no request is sent
/// - `ConsoleError::Conflict` if the email is already registered
/// - `ConsoleError::ServiceUnavailable` for any other failure
#[instrument(skip(client, registration), fields(email = %registration.email))]
pub async fn register(
    client: &ParcelApiClient,
    registration: &Registration,
) -> Result<(), ConsoleError> {
    validate_registration(registration)?;

    match client.register(registration).await {
        Ok(()) => {
            info!("Registered");
            Ok(())
        }
        Err(ApiError::Conflict(_)) => Err(ConsoleError::Conflict(registration.email.clone())),
        Err(e) => Err(e.into()),
    }
}

fn validate_registration(registration: &Registration) -> Result<(), ConsoleError> {
    let fields = [
        ("first name", registration.firstname.as_str()),
        ("last name", registration.lastname.as_str()),
        ("email", registration.email.as_str()),
        ("username", registration.username.as_str()),
        ("password", registration.password.expose_secret()),
    ];
    if let Some((name, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(ConsoleError::Validation(format!("{name} is required")));
    }

    Email::parse(&registration.email)
        .map_err(|e| ConsoleError::Validation(format!("invalid email: {e}")))?;

    Ok(())
}
