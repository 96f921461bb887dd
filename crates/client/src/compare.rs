//! Property comparison list.
//!
//! Holds up to [`MAX_COMPARE_ITEMS`] properties in insertion order, unique
//! by id, and writes the whole list to the store after every change.
//! Adding a duplicate or adding to a full list does nothing; the UI is
//! expected to check [`CompareList::contains`] and [`CompareList::count`]
//! first, and [`AddOutcome`] says what happened for callers that care.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cohort_core::{ComparisonEntry, PropertyId};

use crate::error::add_breadcrumb;
use crate::storage::{KeyValueStore, keys, load_json, save_json};

/// Maximum number of properties compared side by side.
pub const MAX_COMPARE_ITEMS: usize = 4;

/// Result of [`CompareList::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
    Full,
}

/// Comparison list manager.
pub struct CompareList {
    store: Arc<dyn KeyValueStore>,
    entries: Mutex<Vec<ComparisonEntry>>,
}

impl CompareList {
    /// Load the persisted list from `store`, or start empty.
    #[must_use]
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = read_persisted(store.as_ref());
        Self {
            store,
            entries: Mutex::new(entries),
        }
    }

    /// Append `entry` unless its id is already listed or the list is full.
    pub fn add(&self, entry: ComparisonEntry) -> AddOutcome {
        let mut entries = self.state();
        if entries.iter().any(|e| e.id == entry.id) {
            tracing::debug!(property_id = %entry.id, "Already in comparison");
            return AddOutcome::AlreadyPresent;
        }
        if entries.len() >= MAX_COMPARE_ITEMS {
            tracing::debug!(property_id = %entry.id, "Comparison list full");
            return AddOutcome::Full;
        }
        tracing::info!(property_id = %entry.id, "Added to comparison");
        add_breadcrumb(
            "compare",
            "Added property",
            Some(&[("property_id", entry.id.as_str())]),
        );
        entries.push(entry);
        self.persist(&entries);
        AddOutcome::Added
    }

    /// Start a fresh comparison containing only `entry`.
    pub fn replace_all(&self, entry: ComparisonEntry) {
        let mut entries = self.state();
        tracing::info!(property_id = %entry.id, dropped = entries.len(), "Comparison restarted");
        add_breadcrumb(
            "compare",
            "Replaced list",
            Some(&[("property_id", entry.id.as_str())]),
        );
        entries.clear();
        entries.push(entry);
        self.persist(&entries);
    }

    /// Remove the entry with `id`, if listed.
    pub fn remove(&self, id: &PropertyId) {
        let mut entries = self.state();
        let before = entries.len();
        entries.retain(|e| &e.id != id);
        if entries.len() != before {
            tracing::info!(property_id = %id, "Removed from comparison");
            add_breadcrumb("compare", "Removed property", Some(&[("property_id", id.as_str())]));
        }
        self.persist(&entries);
    }

    pub fn clear(&self) {
        let mut entries = self.state();
        entries.clear();
        add_breadcrumb("compare", "Cleared list", None);
        self.persist(&entries);
    }

    #[must_use]
    pub fn contains(&self, id: &PropertyId) -> bool {
        self.state().iter().any(|e| &e.id == id)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.state().len()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.count() >= MAX_COMPARE_ITEMS
    }

    /// Snapshot of the list in display order.
    #[must_use]
    pub fn entries(&self) -> Vec<ComparisonEntry> {
        self.state().clone()
    }

    /// Replace in-memory state with whatever the store now holds.
    ///
    /// For hosts that know the store was changed by someone else.
    pub fn reload(&self) {
        let fresh = read_persisted(self.store.as_ref());
        *self.state() = fresh;
    }

    fn state(&self) -> MutexGuard<'_, Vec<ComparisonEntry>> {
        // The list is replaced or edited in one step, so a poisoned guard
        // still holds a consistent list.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, entries: &[ComparisonEntry]) {
        if let Err(e) = save_json(self.store.as_ref(), keys::COMPARE_LIST, entries) {
            tracing::warn!(error = %e, "Failed to serialize comparison list");
        }
    }
}

impl std::fmt::Debug for CompareList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompareList")
            .field("entries", &*self.state())
            .finish_non_exhaustive()
    }
}

/// Load the stored list and restore the invariants: first occurrence of an
/// id wins and at most [`MAX_COMPARE_ITEMS`] are kept.
fn read_persisted(store: &dyn KeyValueStore) -> Vec<ComparisonEntry> {
    let stored: Vec<ComparisonEntry> = load_json(store, keys::COMPARE_LIST).unwrap_or_default();
    let stored_len = stored.len();

    let mut entries: Vec<ComparisonEntry> = Vec::with_capacity(MAX_COMPARE_ITEMS);
    for entry in stored {
        if entries.len() == MAX_COMPARE_ITEMS {
            break;
        }
        if !entries.iter().any(|e| e.id == entry.id) {
            entries.push(entry);
        }
    }

    if entries.len() != stored_len {
        tracing::warn!(
            stored = stored_len,
            kept = entries.len(),
            "Normalised stored comparison list"
        );
    }
    entries
}
