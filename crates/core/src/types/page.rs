//! Pagination envelopes for the content API.

use serde::{Deserialize, Serialize};

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            has_more: false,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Page selection for a listing request.
///
/// Pages are 1-based. `limit` is clamped to `1..=MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 50;

    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, Self::MAX_LIMIT),
        }
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// The request for the page after this one.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            limit: self.limit,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_clamps() {
        let req = PageRequest::new(0, 500);
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), PageRequest::MAX_LIMIT);
        assert_eq!(PageRequest::new(3, 0).limit(), 1);
    }

    #[test]
    fn test_page_request_next() {
        let req = PageRequest::default().next();
        assert_eq!(req.page(), 2);
        assert_eq!(req.limit(), PageRequest::DEFAULT_LIMIT);
    }

    #[test]
    fn test_page_has_more_defaults_false() {
        let page: Page<u32> = serde_json::from_str(r#"{"items": [1, 2]}"#).unwrap();
        assert_eq!(page.items, vec![1, 2]);
        assert!(!page.has_more);
    }
}
