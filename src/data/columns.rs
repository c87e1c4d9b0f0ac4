//! Column definitions and projection of records onto displayed cells

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::data::record::{DataValue, Record};

/// A displayed column: where to read the cell from and what to call it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub key: String,
    pub label: String,
}

impl ColumnDef {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

static NULL_CELL: DataValue = DataValue::Null;

/// The ordered set of displayed columns.
///
/// With no configured definitions, keyed records are projected through the
/// union of their keys in first-seen order, so every keyed row lines up under
/// the same headers whatever its own key order. Positional records show
/// every value in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Columns {
    defs: Vec<ColumnDef>,
    keys: Vec<String>,
}

impl Columns {
    pub fn new(defs: Vec<ColumnDef>) -> Self {
        Self {
            defs,
            keys: Vec::new(),
        }
    }

    /// Columns for a row set, deriving keys when none are configured
    pub fn for_records<'a, I>(defs: Vec<ColumnDef>, records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut columns = Self::new(defs);
        columns.sync_keys(records);
        columns
    }

    pub fn defs(&self) -> &[ColumnDef] {
        &self.defs
    }

    pub fn is_configured(&self) -> bool {
        !self.defs.is_empty()
    }

    /// Keys derived from keyed records (empty when columns are configured)
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Recompute the derived keys after the rows changed
    pub fn sync_keys<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a Record>,
    {
        self.keys.clear();
        if self.is_configured() {
            return;
        }
        let mut seen = HashSet::new();
        for record in records {
            if let Record::Keyed(pairs) = record {
                for (key, _) in pairs {
                    if seen.insert(key.as_str()) {
                        self.keys.push(key.clone());
                    }
                }
            }
        }
    }

    /// Displayed cells of a record. Missing keys show as null.
    pub fn cells<'a>(&self, record: &'a Record) -> Vec<&'a DataValue> {
        if let Some(keys) = self.projection(record) {
            return keys
                .map(|key| record.get(key).unwrap_or(&NULL_CELL))
                .collect();
        }
        record.values().collect()
    }

    /// Cell at a displayed column index
    pub fn cell<'a>(&self, record: &'a Record, column: usize) -> Option<&'a DataValue> {
        if let Some(mut keys) = self.projection(record) {
            let key = keys.nth(column)?;
            return Some(record.get(key).unwrap_or(&NULL_CELL));
        }
        record.value_at(column)
    }

    /// Keys to read a record through, or None to show its values in order
    fn projection<'s>(&'s self, record: &Record) -> Option<Box<dyn Iterator<Item = &'s str> + 's>> {
        if self.is_configured() {
            return Some(Box::new(self.defs.iter().map(|d| d.key.as_str())));
        }
        match record {
            Record::Keyed(_) if !self.keys.is_empty() => {
                Some(Box::new(self.keys.iter().map(String::as_str)))
            }
            _ => None,
        }
    }

    /// Header labels: configured labels, else the derived keys
    pub fn header_labels(&self) -> Option<Vec<String>> {
        if self.is_configured() {
            return Some(self.defs.iter().map(|d| d.label.clone()).collect());
        }
        if self.keys.is_empty() {
            None
        } else {
            Some(self.keys.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_columns_pick_by_key() {
        let columns = Columns::new(vec![
            ColumnDef::new("name", "Name"),
            ColumnDef::new("missing", "Missing"),
        ]);
        let record = Record::keyed([("id", "1"), ("name", "Ali")]);
        let cells = columns.cells(&record);
        assert_eq!(cells, vec![&DataValue::from("Ali"), &DataValue::Null]);
        assert_eq!(columns.cell(&record, 0), Some(&DataValue::from("Ali")));
        assert_eq!(columns.cell(&record, 5), None);
    }

    #[test]
    fn test_unconfigured_columns_use_all_values() {
        let columns = Columns::default();
        let record = Record::positional(["1", "Ali"]);
        assert_eq!(columns.cells(&record).len(), 2);
        assert_eq!(columns.cell(&record, 1), Some(&DataValue::from("Ali")));
    }

    #[test]
    fn test_header_labels() {
        let keyed = Record::keyed([("id", "1"), ("name", "Ali")]);
        let positional = Record::positional(["1"]);

        let derived = Columns::for_records(Vec::new(), [&keyed]);
        assert_eq!(derived.header_labels(), Some(vec!["id".to_string(), "name".to_string()]));
        assert_eq!(Columns::for_records(Vec::new(), [&positional]).header_labels(), None);

        let labelled = Columns::for_records(vec![ColumnDef::new("0", "ID")], [&keyed]);
        assert_eq!(labelled.header_labels(), Some(vec!["ID".to_string()]));
        assert!(labelled.keys().is_empty());
    }

    #[test]
    fn test_keyed_rows_share_one_key_order() {
        let first = Record::keyed([("id", "1"), ("name", "Ali")]);
        let second = Record::keyed([("name", "Budi"), ("id", "2"), ("city", "Solo")]);
        let columns = Columns::for_records(Vec::new(), [&first, &second]);

        assert_eq!(columns.keys(), &["id", "name", "city"]);
        assert_eq!(
            columns.cells(&second),
            vec![&DataValue::from("2"), &DataValue::from("Budi"), &DataValue::from("Solo")]
        );
        assert_eq!(columns.cell(&first, 2), Some(&DataValue::Null));
        assert_eq!(columns.cell(&second, 0), Some(&DataValue::from("2")));
        assert_eq!(columns.cell(&second, 3), None);

        // Positional rows still show their own values
        let positional = Record::positional(["x", "y"]);
        assert_eq!(columns.cell(&positional, 1), Some(&DataValue::from("y")));
    }
}
