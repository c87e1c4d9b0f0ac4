use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

use crate::error::TableError;

/// Stable identity of a row inside one `RowStore`.
///
/// Assigned once when the row enters the store and never derived from the
/// row's position, so it survives sorting, filtering and deletion of other rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId(pub u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl DataValue {
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => DataValue::Null,
            JsonValue::Bool(b) => DataValue::Boolean(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    DataValue::Integer(i)
                } else {
                    n.as_f64().map(DataValue::Float).unwrap_or(DataValue::Null)
                }
            }
            JsonValue::String(s) => DataValue::String(s.clone()),
            // Nested structures are kept as their JSON text
            other => DataValue::String(other.to_string()),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            DataValue::String(s) => JsonValue::String(s.clone()),
            DataValue::Integer(i) => JsonValue::from(*i),
            DataValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            DataValue::Boolean(b) => JsonValue::Bool(*b),
            DataValue::Null => JsonValue::Null,
        }
    }

    /// Numeric interpretation used by sorting. Strings count when their
    /// trimmed text parses as a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            DataValue::Integer(i) => Some(*i as f64),
            DataValue::Float(f) if f.is_finite() => Some(*f),
            DataValue::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::String(s) => write!(f, "{}", s),
            DataValue::Integer(i) => write!(f, "{}", i),
            DataValue::Float(fl) => write!(f, "{}", fl),
            DataValue::Boolean(b) => write!(f, "{}", b),
            DataValue::Null => write!(f, ""),
        }
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::String(s.to_string())
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::String(s)
    }
}

impl From<i64> for DataValue {
    fn from(i: i64) -> Self {
        DataValue::Integer(i)
    }
}

impl From<f64> for DataValue {
    fn from(f: f64) -> Self {
        DataValue::Float(f)
    }
}

impl From<bool> for DataValue {
    fn from(b: bool) -> Self {
        DataValue::Boolean(b)
    }
}

/// The semantic content of a row: an ordered list of cells, or named cells
/// in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Record {
    Positional(Vec<DataValue>),
    Keyed(Vec<(String, DataValue)>),
}

impl Record {
    /// Build a positional record from anything convertible to cells
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<DataValue>,
    {
        Record::Positional(values.into_iter().map(Into::into).collect())
    }

    /// Build a keyed record preserving the given key order
    pub fn keyed<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<DataValue>,
    {
        Record::Keyed(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Parse one row from JSON. Arrays become positional records and objects
    /// become keyed records; anything else is not a row.
    pub fn from_json(value: &JsonValue) -> Result<Self, TableError> {
        match value {
            JsonValue::Array(items) => Ok(Record::Positional(
                items.iter().map(DataValue::from_json).collect(),
            )),
            JsonValue::Object(map) => Ok(Record::Keyed(
                map.iter()
                    .map(|(k, v)| (k.clone(), DataValue::from_json(v)))
                    .collect(),
            )),
            other => Err(TableError::InvalidInput(format!(
                "expected an array or object for a row, got {}",
                json_kind(other)
            ))),
        }
    }

    /// Parse a whole row collection. The outer value must be an array.
    pub fn collection_from_json(value: &JsonValue) -> Result<Vec<Self>, TableError> {
        let items = value.as_array().ok_or_else(|| {
            TableError::InvalidInput(format!(
                "expected an array of rows, got {}",
                json_kind(value)
            ))
        })?;
        items.iter().map(Record::from_json).collect()
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Record::Positional(values) => {
                JsonValue::Array(values.iter().map(DataValue::to_json).collect())
            }
            Record::Keyed(pairs) => {
                let mut map = serde_json::Map::new();
                for (key, value) in pairs {
                    map.insert(key.clone(), value.to_json());
                }
                JsonValue::Object(map)
            }
        }
    }

    /// All cell values in order
    pub fn values(&self) -> Box<dyn Iterator<Item = &DataValue> + '_> {
        match self {
            Record::Positional(values) => Box::new(values.iter()),
            Record::Keyed(pairs) => Box::new(pairs.iter().map(|(_, v)| v)),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Record::Positional(values) => values.len(),
            Record::Keyed(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look a cell up by column key. Keyed records match the key by name;
    /// positional records treat the key as an index.
    pub fn get(&self, key: &str) -> Option<&DataValue> {
        match self {
            Record::Positional(values) => key.parse::<usize>().ok().and_then(|i| values.get(i)),
            Record::Keyed(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
        }
    }

    /// Cell at a position in value order
    pub fn value_at(&self, index: usize) -> Option<&DataValue> {
        match self {
            Record::Positional(values) => values.get(index),
            Record::Keyed(pairs) => pairs.get(index).map(|(_, v)| v),
        }
    }

    /// Key names of a keyed record
    pub fn keys(&self) -> Option<Vec<&str>> {
        match self {
            Record::Positional(_) => None,
            Record::Keyed(pairs) => Some(pairs.iter().map(|(k, _)| k.as_str()).collect()),
        }
    }

    /// The key an external collaborator knows this row by: the `id` field of a
    /// keyed record, otherwise the first positional value.
    pub fn natural_key(&self) -> Option<String> {
        let value = match self {
            Record::Positional(values) => values.first(),
            Record::Keyed(pairs) => pairs.iter().find(|(k, _)| k == "id").map(|(_, v)| v),
        }?;
        match value {
            DataValue::Null => None,
            DataValue::String(s) if s.is_empty() => None,
            other => Some(other.to_string()),
        }
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_from_json_shapes() {
        let positional = Record::from_json(&json!([1, "Ali", null])).unwrap();
        assert_eq!(
            positional,
            Record::Positional(vec![
                DataValue::Integer(1),
                DataValue::String("Ali".to_string()),
                DataValue::Null
            ])
        );

        let keyed = Record::from_json(&json!({"name": "Budi", "id": 7})).unwrap();
        assert_eq!(keyed.keys(), Some(vec!["name", "id"]));
        assert_eq!(keyed.natural_key(), Some("7".to_string()));

        assert!(Record::from_json(&json!("nope")).is_err());
        assert!(Record::collection_from_json(&json!({"rows": []})).is_err());
    }

    #[test]
    fn test_natural_key_fallbacks() {
        assert_eq!(
            Record::positional(["3", "Walikota"]).natural_key(),
            Some("3".to_string())
        );
        assert_eq!(Record::keyed([("name", "x")]).natural_key(), None);
        assert_eq!(Record::Positional(vec![DataValue::Null]).natural_key(), None);
    }

    #[test]
    fn test_numeric_interpretation() {
        assert_eq!(DataValue::from(" 42 ").as_number(), Some(42.0));
        assert_eq!(DataValue::Float(f64::NAN).as_number(), None);
        assert_eq!(DataValue::from("inf").as_number(), None);
        assert_eq!(DataValue::from("abc").as_number(), None);
        assert_eq!(DataValue::Boolean(true).as_number(), None);
    }

    #[test]
    fn test_get_by_key() {
        let positional = Record::positional(["a", "b"]);
        assert_eq!(positional.get("1"), Some(&DataValue::from("b")));
        assert_eq!(positional.get("name"), None);

        let keyed = Record::keyed([("name", "Ali")]);
        assert_eq!(keyed.get("name"), Some(&DataValue::from("Ali")));
        assert_eq!(keyed.value_at(0), Some(&DataValue::from("Ali")));
    }
}
