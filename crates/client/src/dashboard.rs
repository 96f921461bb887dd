//! Dashboard list shaping.
//!
//! The dashboard endpoints return whole lists; paging, grouping and counts
//! for the tabs are done here.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use cohort_core::{PropertySummary, SavedSearch, SiteVisit, ViewedProperty, VisitStatus};

/// Label for favorites without a location.
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// One page of a client-side paginated list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSlice<T> {
    pub items: Vec<T>,
    /// 1-based page actually shown after clamping.
    pub page: usize,
    pub per_page: usize,
    /// Always at least 1, even for an empty list.
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> PageSlice<T> {
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Take page `page` (1-based) of `items`.
///
/// `page` is clamped into `1..=total_pages` and a `per_page` of zero is
/// treated as one, so the result is always a valid page.
#[must_use]
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> PageSlice<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);

    let items = items
        .chunks(per_page)
        .nth(page - 1)
        .map(<[T]>::to_vec)
        .unwrap_or_default();

    PageSlice {
        items,
        page,
        per_page,
        total_pages,
        total_items,
    }
}

/// Site visits split into dashboard tabs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitGroups {
    /// Scheduled and still ahead, soonest first.
    pub upcoming: Vec<SiteVisit>,
    /// Completed, or scheduled but already passed; most recent first.
    pub past: Vec<SiteVisit>,
    pub cancelled: Vec<SiteVisit>,
}

/// Group visits relative to `now`.
#[must_use]
pub fn group_visits(visits: Vec<SiteVisit>, now: DateTime<Utc>) -> VisitGroups {
    let mut groups = VisitGroups::default();
    for visit in visits {
        match visit.status {
            VisitStatus::Cancelled => groups.cancelled.push(visit),
            VisitStatus::Scheduled if visit.scheduled_at > now => groups.upcoming.push(visit),
            VisitStatus::Scheduled | VisitStatus::Completed => groups.past.push(visit),
        }
    }
    groups.upcoming.sort_by_key(|v| v.scheduled_at);
    groups
        .past
        .sort_by(|a, b| b.scheduled_at.cmp(&a.scheduled_at));
    groups
        .cancelled
        .sort_by(|a, b| b.scheduled_at.cmp(&a.scheduled_at));
    groups
}

/// Search history bucketed by UTC day, newest day and newest search first.
#[must_use]
pub fn group_searches_by_day(searches: Vec<SavedSearch>) -> Vec<(NaiveDate, Vec<SavedSearch>)> {
    let mut days: BTreeMap<NaiveDate, Vec<SavedSearch>> = BTreeMap::new();
    for search in searches {
        days.entry(search.searched_at.date_naive())
            .or_default()
            .push(search);
    }
    days.into_iter()
        .rev()
        .map(|(day, mut searches)| {
            searches.sort_by(|a, b| b.searched_at.cmp(&a.searched_at));
            (day, searches)
        })
        .collect()
}

/// Favorite counts per location, largest first, ties by name.
#[must_use]
pub fn favorites_by_location(favorites: &[PropertySummary]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for property in favorites {
        let location = property
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(UNKNOWN_LOCATION);
        *counts.entry(location).or_default() += 1;
    }

    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(location, n)| (location.to_owned(), n))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

/// Latest view per property, newest first, at most `limit` items.
#[must_use]
pub fn recent_views(viewed: Vec<ViewedProperty>, limit: usize) -> Vec<ViewedProperty> {
    let mut latest: HashMap<String, ViewedProperty> = HashMap::new();
    for view in viewed {
        let key = view.property.id.as_str().to_owned();
        match latest.get(&key) {
            Some(existing) if existing.viewed_at >= view.viewed_at => {}
            _ => {
                latest.insert(key, view);
            }
        }
    }

    let mut views: Vec<ViewedProperty> = latest.into_values().collect();
    views.sort_by(|a, b| b.viewed_at.cmp(&a.viewed_at));
    views.truncate(limit);
    views
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use cohort_core::{PropertyId, SearchId, VisitId, VisitedProperty};
    use pretty_assertions::assert_eq;

    use super::*;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    fn visit(id: &str, when: DateTime<Utc>, status: VisitStatus) -> SiteVisit {
        SiteVisit {
            id: VisitId::new(id),
            property: VisitedProperty {
                id: PropertyId::new(format!("p-{id}")),
                title: "Elm Residency".to_string(),
                location: None,
            },
            scheduled_at: when,
            status,
        }
    }

    fn search(id: &str, when: DateTime<Utc>) -> SavedSearch {
        SavedSearch {
            id: SearchId::new(id),
            query: format!("3 BHK {id}"),
            location: None,
            budget: None,
            searched_at: when,
        }
    }

    fn property(id: &str, location: Option<&str>) -> PropertySummary {
        PropertySummary {
            id: PropertyId::new(id),
            title: id.to_uppercase(),
            price: "₹ 1 Cr".to_string(),
            location: location.map(str::to_string),
            developer: None,
            image: None,
            is_favorite: true,
            is_group_member: false,
            group_size: 0,
        }
    }

    #[test]
    fn test_paginate_middle_page() {
        let items: Vec<u32> = (1..=23).collect();
        let page = paginate(&items, 2, 10);
        assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 23);
        assert!(page.has_previous());
        assert!(page.has_next());
    }

    #[test]
    fn test_paginate_clamps() {
        let items: Vec<u32> = (1..=23).collect();
        let last = paginate(&items, 99, 10);
        assert_eq!(last.page, 3);
        assert_eq!(last.items, vec![21, 22, 23]);
        assert!(!last.has_next());

        assert_eq!(paginate(&items, 0, 10).page, 1);
        assert_eq!(paginate(&items, 1, 0).items, vec![1]);
    }

    #[test]
    fn test_paginate_empty() {
        let page = paginate::<u32>(&[], 3, 10);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
        assert!(!page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn test_group_visits() {
        let now = at(10, 12);
        let groups = group_visits(
            vec![
                visit("late", at(20, 9), VisitStatus::Scheduled),
                visit("soon", at(11, 9), VisitStatus::Scheduled),
                visit("missed", at(9, 9), VisitStatus::Scheduled),
                visit("done", at(5, 9), VisitStatus::Completed),
                visit("off", at(15, 9), VisitStatus::Cancelled),
            ],
            now,
        );

        let ids = |v: &[SiteVisit]| v.iter().map(|v| v.id.as_str().to_owned()).collect::<Vec<_>>();
        assert_eq!(ids(&groups.upcoming), vec!["soon", "late"]);
        assert_eq!(ids(&groups.past), vec!["missed", "done"]);
        assert_eq!(ids(&groups.cancelled), vec!["off"]);
    }

    #[test]
    fn test_group_searches_by_day() {
        let grouped = group_searches_by_day(vec![
            search("a", at(1, 8)),
            search("b", at(2, 8)),
            search("c", at(1, 20)),
        ]);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0, at(2, 0).date_naive());
        assert_eq!(grouped[1].0, at(1, 0).date_naive());
        let first_day: Vec<&str> = grouped[1].1.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(first_day, vec!["c", "a"]);
    }

    #[test]
    fn test_favorites_by_location() {
        let counts = favorites_by_location(&[
            property("a", Some("Whitefield")),
            property("b", Some("Baner")),
            property("c", Some("Whitefield")),
            property("d", None),
            property("e", Some("  ")),
        ]);
        assert_eq!(
            counts,
            vec![
                ("Unknown".to_string(), 2),
                ("Whitefield".to_string(), 2),
                ("Baner".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_recent_views_dedupes() {
        let view = |id: &str, when: DateTime<Utc>| ViewedProperty {
            property: property(id, None),
            viewed_at: when,
        };
        let recent = recent_views(
            vec![
                view("a", at(1, 8)),
                view("b", at(2, 8)),
                view("a", at(3, 8)),
                view("c", at(1, 9)),
            ],
            2,
        );
        let ids: Vec<&str> = recent.iter().map(|v| v.property.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(recent[0].viewed_at, at(3, 8));
    }
}
