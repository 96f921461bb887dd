//! Property, comparison and content records.
//!
//! Prices are display strings formatted by the API (e.g. "₹ 1.2 Cr").
//! No currency arithmetic happens on the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{BlogId, PropertyId};

/// A property selected for side-by-side comparison.
///
/// Identity is the `id`; two entries with the same `id` are the same
/// property regardless of the other fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonEntry {
    pub id: PropertyId,
    pub title: String,
    /// Pre-formatted display price.
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer: Option<String>,
}

impl ComparisonEntry {
    /// Create an entry with only the required fields.
    #[must_use]
    pub fn new(id: impl Into<PropertyId>, title: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price: price.into(),
            image: None,
            location: None,
            developer: None,
        }
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn with_developer(mut self, developer: impl Into<String>) -> Self {
        self.developer = Some(developer.into());
        self
    }
}

/// A property as it appears in listing pages and dashboard lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySummary {
    pub id: PropertyId,
    pub title: String,
    pub price: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub developer: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_group_member: bool,
    /// Buyers already in the group for this property.
    #[serde(default)]
    pub group_size: u32,
}

/// Full property detail page data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetail {
    #[serde(flatten)]
    pub summary: PropertySummary,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Unit configurations on offer, e.g. "2 BHK", "3 BHK".
    #[serde(default)]
    pub configurations: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Buyers needed before the group price unlocks.
    #[serde(default)]
    pub group_target: Option<u32>,
}

impl PropertyDetail {
    /// Buyers still needed to reach the group target, if one is set.
    #[must_use]
    pub fn seats_remaining(&self) -> Option<u32> {
        self.group_target
            .map(|target| target.saturating_sub(self.summary.group_size))
    }
}

impl From<&PropertySummary> for ComparisonEntry {
    fn from(property: &PropertySummary) -> Self {
        Self {
            id: property.id.clone(),
            title: property.title.clone(),
            price: property.price.clone(),
            image: property.image.clone(),
            location: property.location.clone(),
            developer: property.developer.clone(),
        }
    }
}

impl From<&PropertyDetail> for ComparisonEntry {
    fn from(property: &PropertyDetail) -> Self {
        let mut entry = Self::from(&property.summary);
        if entry.image.is_none() {
            entry.image = property.images.first().cloned();
        }
        entry
    }
}

/// Blog listing item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogSummary {
    pub id: BlogId,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    pub published_at: DateTime<Utc>,
}

/// Full blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(flatten)]
    pub summary: BlogSummary,
    /// Rendered HTML body.
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A frequently asked question, optionally grouped (e.g. "NRI", "Payments").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> PropertySummary {
        PropertySummary {
            id: PropertyId::new("p-1"),
            title: "Lakeview Towers".to_string(),
            price: "₹ 95 L".to_string(),
            location: Some("Whitefield".to_string()),
            developer: Some("Prestige".to_string()),
            image: None,
            is_favorite: false,
            is_group_member: false,
            group_size: 12,
        }
    }

    #[test]
    fn test_comparison_entry_omits_missing_metadata() {
        let entry = ComparisonEntry::new("1", "Sky Villa", "₹ 2 Cr");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "1", "title": "Sky Villa", "price": "₹ 2 Cr"})
        );
    }

    #[test]
    fn test_comparison_entry_accepts_numeric_id() {
        let entry: ComparisonEntry =
            serde_json::from_str(r#"{"id": 9, "title": "A", "price": "B", "location": "Pune"}"#)
                .unwrap();
        assert_eq!(entry.id, PropertyId::new("9"));
        assert_eq!(entry.location.as_deref(), Some("Pune"));
    }

    #[test]
    fn test_entry_from_detail_falls_back_to_gallery_image() {
        let detail = PropertyDetail {
            summary: summary(),
            description: String::new(),
            amenities: vec![],
            configurations: vec![],
            images: vec!["a.jpg".to_string(), "b.jpg".to_string()],
            latitude: None,
            longitude: None,
            group_target: Some(20),
        };

        let entry = ComparisonEntry::from(&detail);
        assert_eq!(entry.image.as_deref(), Some("a.jpg"));
        assert_eq!(entry.developer.as_deref(), Some("Prestige"));
        assert_eq!(detail.seats_remaining(), Some(8));
    }

    #[test]
    fn test_detail_parses_flattened_summary() {
        let detail: PropertyDetail = serde_json::from_str(
            r#"{"id": 3, "title": "Palm Grove", "price": "₹ 70 L", "groupSize": 4,
                "isFavorite": true, "amenities": ["Pool"]}"#,
        )
        .unwrap();
        assert!(detail.summary.is_favorite);
        assert_eq!(detail.summary.group_size, 4);
        assert_eq!(detail.amenities, vec!["Pool".to_string()]);
        assert_eq!(detail.seats_remaining(), None);
    }
}
