//! User dashboard records: visits, searches, views and preferences.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::{PropertyId, SearchId, VisitId};
use super::property::PropertySummary;

/// Site visit lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

/// The property a site visit is booked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitedProperty {
    pub id: PropertyId,
    pub title: String,
    #[serde(default)]
    pub location: Option<String>,
}

/// A booked site visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteVisit {
    pub id: VisitId,
    pub property: VisitedProperty,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub status: VisitStatus,
}

/// A property the user opened, with when they opened it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewedProperty {
    pub property: PropertySummary,
    pub viewed_at: DateTime<Utc>,
}

/// A search from the user's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearch {
    pub id: SearchId,
    pub query: String,
    #[serde(default)]
    pub location: Option<Place>,
    #[serde(default)]
    pub budget: Option<BudgetRange>,
    pub searched_at: DateTime<Utc>,
}

/// Errors that can occur when building a [`Place`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlaceError {
    #[error("place name cannot be empty")]
    EmptyName,
    #[error("latitude {0} is outside -90..=90")]
    Latitude(f64),
    #[error("longitude {0} is outside -180..=180")]
    Longitude(f64),
}

/// A place resolved by the map widget.
///
/// The client never geocodes; it only keeps the triple the widget produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPlace")]
pub struct Place {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Place {
    /// Validate and build a place.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank name or out-of-range coordinates
    /// (NaN is out of range).
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Result<Self, PlaceError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PlaceError::EmptyName);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(PlaceError::Latitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(PlaceError::Longitude(longitude));
        }
        Ok(Self {
            name,
            latitude,
            longitude,
        })
    }
}

#[derive(Deserialize)]
struct RawPlace {
    name: String,
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawPlace> for Place {
    type Error = PlaceError;

    fn try_from(raw: RawPlace) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.latitude, raw.longitude)
    }
}

/// Errors that can occur when building a [`BudgetRange`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BudgetRangeError {
    #[error("budget cannot be negative")]
    Negative,
    #[error("budget minimum {min} exceeds maximum {max}")]
    Inverted { min: Decimal, max: Decimal },
}

/// Inclusive budget range in rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBudgetRange")]
pub struct BudgetRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl BudgetRange {
    /// # Errors
    ///
    /// Returns an error if either bound is negative or `min > max`.
    pub fn new(min: Decimal, max: Decimal) -> Result<Self, BudgetRangeError> {
        if min.is_sign_negative() || max.is_sign_negative() {
            return Err(BudgetRangeError::Negative);
        }
        if min > max {
            return Err(BudgetRangeError::Inverted { min, max });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn contains(&self, amount: Decimal) -> bool {
        self.min <= amount && amount <= self.max
    }
}

#[derive(Deserialize)]
struct RawBudgetRange {
    min: Decimal,
    max: Decimal,
}

impl TryFrom<RawBudgetRange> for BudgetRange {
    type Error = BudgetRangeError;

    fn try_from(raw: RawBudgetRange) -> Result<Self, Self::Error> {
        Self::new(raw.min, raw.max)
    }
}

/// Saved dashboard preferences.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub locations: Vec<Place>,
    #[serde(default)]
    pub budget: Option<BudgetRange>,
    #[serde(default)]
    pub property_types: Vec<String>,
    #[serde(default)]
    pub bedrooms: Vec<u8>,
    #[serde(default)]
    pub notify_by_email: bool,
    #[serde(default)]
    pub notify_by_sms: bool,
}
