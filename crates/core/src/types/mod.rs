//! Core types for Cohort Homes.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod contact;
pub mod dashboard;
pub mod id;
pub mod page;
pub mod property;
pub mod user;

pub use contact::{Email, EmailError, Inquiry, PhoneError, PhoneNumber};
pub use dashboard::{
    BudgetRange, BudgetRangeError, Place, PlaceError, Preferences, SavedSearch, SiteVisit,
    VisitStatus, VisitedProperty, ViewedProperty,
};
pub use id::*;
pub use page::{Page, PageRequest};
pub use property::{
    BlogPost, BlogSummary, ComparisonEntry, Faq, PropertyDetail, PropertySummary,
};
pub use user::{AuthToken, AuthTokenError, User};
