//! Parcel collection commands.
//!
//! # Usage
//!
//! ```bash
//! parcel-cli parcels list
//! parcel-cli parcels list --search abc
//! parcel-cli parcels lookup TN1
//! parcel-cli parcels create --tracking-number TN9 --destination Lyon --owner-email ops@depot.io
//! parcel-cli parcels delete 9
//! parcel-cli parcels status 9 "Held at customs"
//! parcel-cli parcels status 9 --in-progress --lifecycle
//! ```

use parcel_console::{
    Console, ConsoleError, Notification, Parcel, ParcelDraft, ParcelId, ParcelStatus, StatusPolicy,
};

/// Status requested on the command line.
pub enum Target {
    Status(String),
    InProgress,
    Done,
}

#[allow(clippy::print_stdout)]
fn print_parcels<'a>(parcels: impl IntoIterator<Item = &'a Parcel>) {
    println!("{:>6}  {:<20}  {:<20}  {:<14}  OWNER", "ID", "TRACKING", "DESTINATION", "STATUS");
    for parcel in parcels {
        let owner = parcel
            .owner()
            .map(|owner| {
                owner
                    .username
                    .clone()
                    .unwrap_or_else(|| format!("user {} ({})", owner.id, owner.role))
            })
            .unwrap_or_default();
        println!(
            "{:>6}  {:<20}  {:<20}  {:<14}  {owner}",
            parcel.id().as_i64(),
            parcel.tracking_number(),
            parcel.destination(),
            parcel.status().as_str(),
        );
    }
}

/// List the collection, optionally filtered.
///
/// # Errors
///
/// Never fails once the collection is loaded.
pub async fn list(console: &Console, search: Option<&str>) -> Result<Notification, ConsoleError> {
    let parcels = console.parcels().search(search.unwrap_or_default()).await;
    print_parcels(&parcels);
    Ok(Notification::success(
        "Parcels",
        format!("{} parcel(s) shown.", parcels.len()),
    ))
}

/// Look up a parcel on the service by exact tracking number.
///
/// # Errors
///
/// Returns `ConsoleError` if the tracking number is blank or the service fails.
pub async fn lookup(console: &Console, tracking_number: &str) -> Result<Notification, ConsoleError> {
    match console.parcels().lookup(tracking_number).await? {
        Some(parcel) => {
            print_parcels([&parcel]);
            Ok(Notification::success(
                "Parcel Found",
                format!("Found parcel {}.", parcel.tracking_number()),
            ))
        }
        None => Ok(Notification::error(
            "No Result",
            format!("No parcel with tracking number {tracking_number}."),
        )),
    }
}

/// Create a parcel.
///
/// # Errors
///
/// Returns `ConsoleError` if the draft is invalid, the owner is unknown, or
/// the service fails.
pub async fn create(
    console: &Console,
    tracking_number: String,
    destination: String,
    status: String,
    owner_email: String,
) -> Result<Notification, ConsoleError> {
    let draft = ParcelDraft {
        tracking_number,
        destination,
        status: ParcelStatus::new(status),
        owner_email,
    };
    let parcel = console.parcels().create(draft).await?;
    print_parcels([&parcel]);
    Ok(Notification::success(
        "Parcel Created",
        format!("Parcel {} was created.", parcel.tracking_number()),
    ))
}

/// Delete a parcel.
///
/// # Errors
///
/// Returns `ConsoleError::ServiceUnavailable` if the service fails.
pub async fn delete(console: &Console, id: ParcelId) -> Result<Notification, ConsoleError> {
    console.parcels().delete(id).await?;
    Ok(Notification::success(
        "Parcel Deleted",
        format!("Parcel {id} was deleted."),
    ))
}

/// Change a parcel's status.
///
/// # Errors
///
/// Returns `ConsoleError` if the policy rejects the change or the service fails.
pub async fn set_status(
    console: &Console,
    id: ParcelId,
    target: Target,
    lifecycle: bool,
) -> Result<Notification, ConsoleError> {
    let policy = if lifecycle {
        StatusPolicy::Lifecycle
    } else {
        StatusPolicy::Permissive
    };
    let controller = console.status(policy);

    let confirmed = match target {
        Target::Status(status) => controller.set_status(id, status).await?,
        Target::InProgress => controller.mark_in_progress(id).await?,
        Target::Done => controller.mark_done(id).await?,
    };

    Ok(Notification::success(
        "Status Updated",
        format!("Parcel {id} is now {confirmed}."),
    ))
}
