//! Row selection.

use std::collections::HashSet;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Which records the "select all" checkbox targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectAllScope {
    /// Every record of the fetched collection, on any page and whether or
    /// not it matches the current query.
    #[default]
    Fetched,
    /// Only the records in the current page window.
    Page,
}

/// The set of currently selected record identifiers.
///
/// The tracker only holds identifiers. Keeping it a subset of the
/// collection is the caller's job: call [`reconcile`](Self::reconcile)
/// after every change to the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionTracker<Id: Eq + Hash> {
    selected: HashSet<Id>,
}

impl<Id: Eq + Hash + Clone> SelectionTracker<Id> {
    /// Creates an empty selection.
    pub fn new() -> Self {
        SelectionTracker {
            selected: HashSet::new(),
        }
    }

    /// Handles the header checkbox: when `checked`, the selection becomes
    /// exactly `ids`; otherwise it is cleared.
    pub fn toggle_all<'a, I>(&mut self, checked: bool, ids: I)
    where
        I: IntoIterator<Item = &'a Id>,
        Id: 'a,
    {
        self.selected.clear();
        if checked {
            self.selected.extend(ids.into_iter().cloned());
        }
    }

    /// Flips the selection of one record. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &Id) -> bool {
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.clone());
            true
        }
    }

    /// Removes every identifier.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Returns `true` if the record is selected.
    pub fn is_selected(&self, id: &Id) -> bool {
        self.selected.contains(id)
    }

    /// Drops one identifier, e.g. after the record was deleted.
    pub fn remove(&mut self, id: &Id) -> bool {
        self.selected.remove(id)
    }

    /// Keeps only identifiers present in `current`.
    pub fn reconcile<'a, I>(&mut self, current: I)
    where
        I: IntoIterator<Item = &'a Id>,
        Id: 'a,
    {
        let current: HashSet<&Id> = current.into_iter().collect();
        self.selected.retain(|id| current.contains(id));
    }

    /// Number of selected records.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Iterates over the selected identifiers in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Id> {
        self.selected.iter()
    }
}

impl<Id: Eq + Hash + Clone> Default for SelectionTracker<Id> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_all_replaces_selection() {
        let mut sel = SelectionTracker::new();
        sel.toggle(&9);
        sel.toggle_all(true, &[1, 2, 3]);
        assert_eq!(sel.len(), 3);
        assert!(sel.is_selected(&1));
        assert!(!sel.is_selected(&9));
    }

    #[test]
    fn unchecking_clears() {
        let mut sel = SelectionTracker::new();
        sel.toggle_all(true, &[1, 2, 3]);
        sel.toggle_all(false, &[1, 2, 3]);
        assert!(sel.is_empty());
    }

    #[test]
    fn toggle_single() {
        let mut sel = SelectionTracker::new();
        assert!(sel.toggle(&"a"));
        assert!(sel.is_selected(&"a"));
        assert!(!sel.toggle(&"a"));
        assert!(!sel.is_selected(&"a"));
    }

    #[test]
    fn reconcile_intersects() {
        let mut sel = SelectionTracker::new();
        sel.toggle_all(true, &[1, 2, 3, 4]);
        sel.reconcile(&[2, 4, 6]);
        let mut ids: Vec<i32> = sel.iter().copied().collect();
        ids.sort();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn default_scope_is_fetched() {
        assert_eq!(SelectAllScope::default(), SelectAllScope::Fetched);
    }
}
