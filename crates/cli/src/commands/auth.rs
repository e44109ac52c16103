//! Authentication commands.
//!
//! The token printed by `login` is not stored; export it as
//! `PARCEL_API_TOKEN` for subsequent commands.

use parcel_console::{ConsoleError, Notification, ParcelApiClient, Registration, auth};
use secrecy::{ExposeSecret, SecretString};

/// Build a registration form from command-line arguments.
pub fn form(
    firstname: String,
    lastname: String,
    email: String,
    username: String,
    password: String,
) -> Registration {
    Registration {
        firstname,
        lastname,
        email,
        username,
        password: SecretString::from(password),
    }
}

/// Log in and print the bearer token.
///
/// # Errors
///
/// Returns `ConsoleError` if the credentials are blank or rejected.
pub async fn login(
    client: &ParcelApiClient,
    username: &str,
    password: String,
) -> Result<Notification, ConsoleError> {
    let token = auth::login(client, username, &SecretString::from(password)).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{}", token.expose_secret());
    }

    Ok(Notification::success(
        "Logged In",
        format!("Authenticated as {username}."),
    ))
}

/// Register a new user.
///
/// # Errors
///
/// Returns `ConsoleError::Conflict` if the email is taken, or another
/// `ConsoleError` for invalid input or service failures.
pub async fn register(
    client: &ParcelApiClient,
    registration: &Registration,
) -> Result<Notification, ConsoleError> {
    auth::register(client, registration).await?;
    Ok(Notification::success(
        "Registered",
        format!("User {} was registered.", registration.username),
    ))
}
