//! Stores over the console state.
//!
//! - [`ParcelStore`] - the parcel collection
//! - [`LocationHistoryStore`] - the selected parcel's location history
//!
//! Both commit only after the remote service confirms a change.

mod locations;
mod parcels;

pub use locations::LocationHistoryStore;
pub use parcels::ParcelStore;
