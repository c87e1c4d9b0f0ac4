use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde_json::Value as JsonValue;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

use crate::data::columns::ColumnDef;
use crate::data::record::{DataValue, Record};

/// Rows read from a file, plus the column definitions the file implies
#[derive(Debug, Clone)]
pub struct LoadedRows {
    pub records: Vec<Record>,
    pub columns: Vec<ColumnDef>,
}

/// Infer a typed cell from CSV text
fn infer_cell(value: &str) -> DataValue {
    if value.is_empty() {
        return DataValue::Null;
    }
    if let Ok(i) = value.parse::<i64>() {
        return DataValue::Integer(i);
    }
    if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") {
        return DataValue::Boolean(value.eq_ignore_ascii_case("true"));
    }
    DataValue::String(value.to_string())
}

/// Load a CSV file with a header row into positional records.
/// Columns are keyed by position and labelled with the header names.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<LoadedRows> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open CSV file: {:?}", path.as_ref()))?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let columns: Vec<ColumnDef> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(idx, name)| ColumnDef::new(idx.to_string(), name))
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.with_context(|| format!("Malformed CSV in {:?}", path.as_ref()))?;
        records.push(Record::Positional(row.iter().map(infer_cell).collect()));
    }

    info!(target: "loader", "Loaded {} CSV rows from {:?}", records.len(), path.as_ref());
    Ok(LoadedRows { records, columns })
}

/// Load a JSON file containing an array of rows (arrays or objects)
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<LoadedRows> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open JSON file: {:?}", path.as_ref()))?;
    let value: JsonValue = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse JSON in {:?}", path.as_ref()))?;
    let records = Record::collection_from_json(&value)?;

    info!(target: "loader", "Loaded {} JSON rows from {:?}", records.len(), path.as_ref());
    Ok(LoadedRows {
        records,
        columns: Vec::new(),
    })
}

/// Load by file extension
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<LoadedRows> {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("csv") => load_csv(path),
        Some("json") => load_json(path),
        _ => Err(anyhow::anyhow!(
            "Unsupported file type: {:?} (expected .csv or .json)",
            path.as_ref()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_csv_types_and_headers() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "id,name,active\n1,Ali,true\n2,\"Budi, Jr\",false").unwrap();
        file.flush().unwrap();

        let loaded = load_file(file.path()).unwrap();
        assert_eq!(loaded.columns[1], ColumnDef::new("1", "name"));
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(
            loaded.records[1],
            Record::Positional(vec![
                DataValue::Integer(2),
                DataValue::from("Budi, Jr"),
                DataValue::Boolean(false)
            ])
        );
    }

    #[test]
    fn test_load_json_rejects_non_array() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{\"id\": 1}}").unwrap();
        file.flush().unwrap();
        assert!(load_json(file.path()).is_err());
    }

    #[test]
    fn test_unknown_extension() {
        assert!(load_file("rows.xml").is_err());
    }
}
