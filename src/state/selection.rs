//! Selection tracking keyed by row identity

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::trace;

use crate::data::record::RowId;
use crate::data::row_store::{RowStore, StoredRow};

/// State of a "select all" control for a group of rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    Checked,
    Unchecked,
    Indeterminate,
}

/// Set of selected row identities.
///
/// Membership does not depend on position, filtering or sorting. Entries for
/// rows that have since been deleted stay in the set but never resolve.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    selected: HashSet<RowId>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: RowId, checked: bool) {
        if checked {
            self.selected.insert(id);
        } else {
            self.selected.remove(&id);
        }
        trace!(target: "selection", "Row {} selected={}", id, checked);
    }

    /// Flip one row, returning its new state
    pub fn toggle(&mut self, id: RowId) -> bool {
        let checked = !self.selected.contains(&id);
        self.set(id, checked);
        checked
    }

    /// Add or remove every row of the rendered window
    pub fn select_all_visible(&mut self, visible: &[RowId], checked: bool) {
        for &id in visible {
            if checked {
                self.selected.insert(id);
            } else {
                self.selected.remove(&id);
            }
        }
        trace!(
            target: "selection",
            "Select all visible ({} rows) = {}, {} selected",
            visible.len(),
            checked,
            self.selected.len()
        );
    }

    /// True iff the window is non-empty and every row in it is selected
    pub fn is_all_visible_selected(&self, visible: &[RowId]) -> bool {
        !visible.is_empty() && visible.iter().all(|id| self.selected.contains(id))
    }

    pub fn check_state(&self, visible: &[RowId]) -> CheckState {
        let count = visible
            .iter()
            .filter(|id| self.selected.contains(id))
            .count();
        if count == 0 {
            CheckState::Unchecked
        } else if count == visible.len() {
            CheckState::Checked
        } else {
            CheckState::Indeterminate
        }
    }

    pub fn is_selected(&self, id: RowId) -> bool {
        self.selected.contains(&id)
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Raw set size, including entries whose rows no longer exist
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected rows that still exist, in store order
    pub fn selected_rows<'a>(&self, store: &'a RowStore) -> Vec<&'a StoredRow> {
        store
            .iter()
            .filter(|row| self.selected.contains(&row.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::Record;

    #[test]
    fn test_check_state_transitions() {
        let mut selection = SelectionTracker::new();
        let window = [RowId(1), RowId(2)];
        assert_eq!(selection.check_state(&window), CheckState::Unchecked);

        selection.set(RowId(1), true);
        assert_eq!(selection.check_state(&window), CheckState::Indeterminate);
        assert!(!selection.is_all_visible_selected(&window));

        selection.select_all_visible(&window, true);
        assert_eq!(selection.check_state(&window), CheckState::Checked);
        assert!(selection.is_all_visible_selected(&window));

        selection.select_all_visible(&window, false);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_empty_window_is_never_all_selected() {
        let selection = SelectionTracker::new();
        assert!(!selection.is_all_visible_selected(&[]));
        assert_eq!(selection.check_state(&[]), CheckState::Unchecked);
    }

    #[test]
    fn test_selected_rows_drop_deleted_entries() {
        let mut store = RowStore::from_records(vec![
            Record::positional(["1"]),
            Record::positional(["2"]),
        ]);
        let first = store.get_at(0).unwrap().id;
        let second = store.get_at(1).unwrap().id;

        let mut selection = SelectionTracker::new();
        selection.set(first, true);
        selection.set(second, true);
        store.remove(first).unwrap();

        let rows = selection.selected_rows(&store);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, second);
        // The stale entry is not pruned
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_toggle() {
        let mut selection = SelectionTracker::new();
        assert!(selection.toggle(RowId(3)));
        assert!(!selection.toggle(RowId(3)));
    }
}
