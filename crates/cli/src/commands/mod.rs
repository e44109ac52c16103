//! CLI command implementations.

pub mod auth;
pub mod locations;
pub mod parcels;
