//! Cache types for content API responses.

use cohort_core::{BlogPost, Faq, PropertyDetail, PropertyId};

/// Cache key for property detail and content.
///
/// Property details carry per-user flags (`isFavorite`, `isGroupMember`),
/// so they are keyed by viewer as well.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Property {
        id: PropertyId,
        viewer: Option<String>,
    },
    Blog(String),
    Faqs,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Property(Box<PropertyDetail>),
    Blog(Box<BlogPost>),
    Faqs(Vec<Faq>),
}
