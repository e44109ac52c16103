//! Domain models for the parcel console.

pub mod location;
pub mod parcel;
pub mod user;

pub use location::{LocationEvent, LocationHistory};
pub use parcel::{Parcel, ParcelDraft, UserRef};
pub use user::DirectoryUser;
