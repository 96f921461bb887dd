//! Cohort Homes client library.
//!
//! The state core behind the site's comparison tray, sign-in and dashboard:
//!
//! - [`storage`] - durable key-value bridge the state is mirrored to
//! - [`compare`] - up-to-four property comparison list
//! - [`auth`] - token + user session with change notifications
//! - [`notify`] - observer registry used by the session
//! - [`api`] - REST client for properties, content and the dashboard
//! - [`dashboard`] - paging and grouping of dashboard lists
//! - [`state`] - the context object tying it together

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod compare;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod notify;
pub mod state;
pub mod storage;

pub use error::{ClientError, Result};
