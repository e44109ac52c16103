//! Location history commands.
//!
//! Each command selects the parcel, loads its history, then acts on it.
//!
//! # Usage
//!
//! ```bash
//! parcel-cli locations list 5
//! parcel-cli locations add 5 --description "Warehouse A" --timestamp 2024-03-01T08:30:00Z
//! parcel-cli locations remove 5 10
//! ```

use chrono::{DateTime, Utc};
use parcel_console::{Console, ConsoleError, LocationEvent, LocationId, Notification, ParcelId};

#[allow(clippy::print_stdout)]
fn print_events(events: &[LocationEvent]) {
    println!("{:>6}  {:<25}  DESCRIPTION", "ID", "TIMESTAMP");
    for event in events {
        println!(
            "{:>6}  {:<25}  {}",
            event.id.as_i64(),
            event.timestamp.to_rfc3339(),
            event.description
        );
    }
}

async fn select(console: &Console, parcel_id: ParcelId) -> Result<(), ConsoleError> {
    let parcel = console
        .parcels()
        .get(parcel_id)
        .await
        .ok_or_else(|| ConsoleError::Validation(format!("parcel {parcel_id} does not exist")))?;

    let locations = console.locations();
    locations.select(parcel).await;
    locations.refresh(parcel_id).await?;
    Ok(())
}

/// Show a parcel's location history.
///
/// # Errors
///
/// Returns `ConsoleError` if the parcel is unknown or the service fails.
pub async fn list(console: &Console, parcel_id: ParcelId) -> Result<Notification, ConsoleError> {
    select(console, parcel_id).await?;

    let history = console.locations().history().await.unwrap_or_default();
    let events = history.events().unwrap_or_default();
    print_events(events);

    Ok(Notification::success(
        "Location History",
        format!("{} location(s) for parcel {parcel_id}.", events.len()),
    ))
}

/// Record a location for a parcel.
///
/// # Errors
///
/// Returns `ConsoleError` if the description is blank, the parcel is
/// unknown, or the service fails.
pub async fn add(
    console: &Console,
    parcel_id: ParcelId,
    description: &str,
    timestamp: DateTime<Utc>,
) -> Result<Notification, ConsoleError> {
    select(console, parcel_id).await?;

    let event = console
        .locations()
        .add(parcel_id, description, Some(timestamp))
        .await?;
    print_events(std::slice::from_ref(&event));

    Ok(Notification::success(
        "Location Added",
        format!("Location {} was added to parcel {parcel_id}.", event.id),
    ))
}

/// Delete a location entry.
///
/// # Errors
///
/// Returns `ConsoleError` if the parcel is unknown or the service fails.
pub async fn remove(
    console: &Console,
    parcel_id: ParcelId,
    location_id: LocationId,
) -> Result<Notification, ConsoleError> {
    select(console, parcel_id).await?;
    console.locations().remove(location_id).await?;

    Ok(Notification::success(
        "Location Deleted",
        format!("Location {location_id} was deleted."),
    ))
}
