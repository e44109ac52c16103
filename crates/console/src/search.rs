//! Tracking number search over the parcel collection.

use crate::models::Parcel;

/// Parcels whose tracking number contains `query`, compared case-insensitively,
/// in collection order. An empty query returns every parcel.
#[must_use]
pub fn filter<'a>(parcels: &'a [Parcel], query: &str) -> Vec<&'a Parcel> {
    if query.is_empty() {
        return parcels.iter().collect();
    }

    let needle = query.to_lowercase();
    parcels
        .iter()
        .filter(|parcel| parcel.tracking_number().to_lowercase().contains(&needle))
        .collect()
}
