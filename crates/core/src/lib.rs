//! Parcel Console Core - Shared types library.
//!
//! This crate provides common types used across all parcel console components:
//! - `console` - Parcel/location state synchronization against the remote service
//! - `cli` - Command-line host for the console
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, statuses and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
