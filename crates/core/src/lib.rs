//! Cohort Homes Core - Shared types library.
//!
//! This crate provides common types used across all Cohort Homes components:
//! - `client` - Comparison list, auth session and API client core
//! - `cli` - Command-line front end over the client core
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no storage,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, property and comparison records, the session
//!   user, dashboard records, pagination and contact form validation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
