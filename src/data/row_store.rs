use tracing::debug;

use crate::data::record::{Record, RowId};
use crate::error::TableError;

/// A record together with the identity the store assigned to it
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRow {
    pub id: RowId,
    pub record: Record,
}

/// The authoritative, ordered row collection.
///
/// Only add/update/delete/replace mutate it. Identities come from a counter
/// owned by the store and are never reused.
#[derive(Debug, Clone, Default)]
pub struct RowStore {
    rows: Vec<StoredRow>,
    next_id: u64,
}

impl RowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        let mut store = Self::new();
        store.replace_all(records);
        store
    }

    fn allocate_id(&mut self) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Replace every row. New identities are issued, so selections made
    /// against the previous rows no longer resolve.
    pub fn replace_all(&mut self, records: Vec<Record>) {
        let rows: Vec<StoredRow> = records
            .into_iter()
            .map(|record| StoredRow {
                id: self.allocate_id(),
                record,
            })
            .collect();
        debug!(target: "row_store", "Replaced rows: {} -> {}", self.rows.len(), rows.len());
        self.rows = rows;
    }

    pub fn append(&mut self, record: Record) -> RowId {
        let id = self.allocate_id();
        self.rows.push(StoredRow { id, record });
        debug!(target: "row_store", "Appended row {} (total {})", id, self.rows.len());
        id
    }

    /// Replace the record of an existing row, keeping its identity
    pub fn update(&mut self, id: RowId, record: Record) -> Result<(), TableError> {
        let row = self
            .rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(TableError::RowNotFound(id))?;
        row.record = record;
        debug!(target: "row_store", "Updated row {}", id);
        Ok(())
    }

    pub fn remove(&mut self, id: RowId) -> Result<StoredRow, TableError> {
        let index = self.position(id).ok_or(TableError::RowNotFound(id))?;
        let removed = self.rows.remove(index);
        debug!(target: "row_store", "Removed row {} at index {}", id, index);
        Ok(removed)
    }

    pub fn remove_at(&mut self, index: usize) -> Result<StoredRow, TableError> {
        if index >= self.rows.len() {
            return Err(TableError::IndexOutOfBounds {
                index,
                len: self.rows.len(),
            });
        }
        Ok(self.rows.remove(index))
    }

    pub fn get(&self, id: RowId) -> Option<&StoredRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn get_at(&self, index: usize) -> Option<&StoredRow> {
        self.rows.get(index)
    }

    pub fn position(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    pub fn contains(&self, id: RowId) -> bool {
        self.position(id).is_some()
    }

    pub fn rows(&self) -> &[StoredRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StoredRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
