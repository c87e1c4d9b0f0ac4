use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::columns::Columns;
use crate::data::datavalue_compare::compare_optional_datavalues;
use crate::data::record::{Record, RowId};
use crate::data::row_store::{RowStore, StoredRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Active sort: a displayed column and a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: usize,
    pub direction: SortDirection,
}

impl SortState {
    pub fn ascending(column: usize) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(column: usize) -> Self {
        Self {
            column,
            direction: SortDirection::Descending,
        }
    }

    /// Sort state after a sortable header is activated: the same column flips
    /// direction, a different column starts ascending.
    pub fn activate(current: Option<SortState>, column: usize) -> SortState {
        match current {
            Some(state) if state.column == column => SortState {
                column,
                direction: state.direction.toggle(),
            },
            _ => SortState::ascending(column),
        }
    }
}

/// Case-insensitive substring predicate over every value of a record
pub fn record_matches(record: &Record, needle_lower: &str) -> bool {
    if needle_lower.is_empty() {
        return true;
    }
    record
        .values()
        .any(|value| value.to_string().to_lowercase().contains(needle_lower))
}

/// The filtered and sorted projection of a `RowStore`.
///
/// Holds positions into the store, so it must be rebuilt after every
/// mutation of the store, search text or sort state.
#[derive(Debug, Clone, Default)]
pub struct DataView {
    /// Store positions that are visible (after filtering and sorting)
    visible_rows: Vec<usize>,

    /// Lower-cased search text
    search: String,

    sort: Option<SortState>,
}

impl DataView {
    /// Create a view showing every row of the store in order
    pub fn new(store: &RowStore) -> Self {
        Self {
            visible_rows: (0..store.len()).collect(),
            search: String::new(),
            sort: None,
        }
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.search = search.to_lowercase();
        self
    }

    pub fn with_sort(mut self, sort: Option<SortState>) -> Self {
        self.sort = sort;
        self
    }

    pub fn set_search(&mut self, search: &str) {
        self.search = search.to_lowercase();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_sort(&mut self, sort: Option<SortState>) {
        self.sort = sort;
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    /// Recompute the projection from the store
    pub fn rebuild(&mut self, store: &RowStore, columns: &Columns) {
        let mut visible: Vec<usize> = store
            .iter()
            .enumerate()
            .filter(|(_, row)| record_matches(&row.record, &self.search))
            .map(|(idx, _)| idx)
            .collect();

        if let Some(sort) = self.sort {
            let rows = store.rows();
            // Stable: equal keys keep store order
            visible.sort_by(|&a, &b| {
                let cmp = compare_optional_datavalues(
                    columns.cell(&rows[a].record, sort.column),
                    columns.cell(&rows[b].record, sort.column),
                );
                match sort.direction {
                    SortDirection::Ascending => cmp,
                    SortDirection::Descending => cmp.reverse(),
                }
            });
        }

        debug!(
            target: "data_view",
            "Rebuilt view: {} of {} rows (search='{}', sort={:?})",
            visible.len(),
            store.len(),
            self.search,
            self.sort
        );
        self.visible_rows = visible;
    }

    /// Number of rows in the projection
    pub fn row_count(&self) -> usize {
        self.visible_rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible_rows.is_empty()
    }

    /// Row at a filtered index
    pub fn get_row<'a>(&self, store: &'a RowStore, index: usize) -> Option<&'a StoredRow> {
        let store_idx = *self.visible_rows.get(index)?;
        store.get_at(store_idx)
    }

    /// Rows in a filtered index range, clamped to the projection
    pub fn rows_in<'a>(
        &self,
        store: &'a RowStore,
        range: std::ops::Range<usize>,
    ) -> Vec<&'a StoredRow> {
        let end = range.end.min(self.visible_rows.len());
        let start = range.start.min(end);
        self.visible_rows[start..end]
            .iter()
            .filter_map(|&idx| store.get_at(idx))
            .collect()
    }

    /// Every row of the projection in order
    pub fn get_rows<'a>(&self, store: &'a RowStore) -> Vec<&'a StoredRow> {
        self.rows_in(store, 0..self.visible_rows.len())
    }

    /// Identities of the rows in a filtered index range
    pub fn ids_in(&self, store: &RowStore, range: std::ops::Range<usize>) -> Vec<RowId> {
        self.rows_in(store, range).into_iter().map(|r| r.id).collect()
    }

    /// Store positions (after filtering and sorting)
    pub fn visible_row_indices(&self) -> &[usize] {
        &self.visible_rows
    }
}
