//! Parcel Console library.
//!
//! Keeps a local parcel collection and the selected parcel's location
//! history in sync with the remote parcel service.
//!
//! # Architecture
//!
//! - [`Console`] owns all mutable state and hands out narrow views over it
//! - [`ParcelStore`] and [`LocationHistoryStore`] commit a change only after
//!   the service confirms it
//! - [`api::ParcelBackend`] is the seam to the service; [`ParcelApiClient`]
//!   implements it over HTTP
//!
//! # Example
//!
//! ```no_run
//! use parcel_console::{Console, ConsoleConfig, ParcelApiClient};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConsoleConfig::from_env()?;
//! let console = Console::new(ParcelApiClient::new(&config)?);
//!
//! console.parcels().load_all().await?;
//! for parcel in console.parcels().search("tn").await {
//!     tracing::info!(tracking_number = parcel.tracking_number(), "match");
//! }
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod search;
pub mod state;
pub mod status;
pub mod store;

#[cfg(test)]
mod testing;

pub use api::{ApiError, ParcelApiClient, Registration};
pub use config::{ConfigError, ConsoleConfig};
pub use directory::UserDirectory;
pub use error::{ConsoleError, Notification, NotificationLevel};
pub use models::{DirectoryUser, LocationEvent, LocationHistory, Parcel, ParcelDraft, UserRef};
pub use state::Console;
pub use status::{StatusController, StatusPolicy};
pub use store::{LocationHistoryStore, ParcelStore};

pub use parcel_console_core::{Lifecycle, LocationId, ParcelId, ParcelStatus};
