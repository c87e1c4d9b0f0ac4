use anyhow::{anyhow, Context, Result};
use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::data::columns::Columns;
use crate::data::row_store::StoredRow;

/// Handles exporting rows to delimited text
pub struct DataExporter;

impl DataExporter {
    /// Render rows as CSV: every field double-quoted with internal quotes
    /// doubled, one row per line, optional header row first.
    pub fn to_csv_string(
        rows: &[&StoredRow],
        columns: &Columns,
        headers: Option<&[String]>,
    ) -> Result<String> {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .flexible(true)
            .from_writer(Vec::new());

        if let Some(headers) = headers {
            writer.write_record(headers)?;
        }

        for row in rows {
            let fields: Vec<String> = columns
                .cells(&row.record)
                .into_iter()
                .map(|cell| cell.to_string())
                .collect();
            writer.write_record(&fields)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow!("Failed to flush CSV writer: {}", e))?;
        let mut text = String::from_utf8(bytes).context("CSV output was not valid UTF-8")?;
        // One row per line, no trailing terminator after the last row
        if text.ends_with('\n') {
            text.pop();
        }
        Ok(text)
    }

    /// Write CSV text to a file, returning the number of bytes written
    pub fn write_csv_file<P: AsRef<Path>>(path: P, csv_text: &str) -> Result<usize> {
        let mut file = File::create(&path)
            .with_context(|| format!("Failed to create export file: {:?}", path.as_ref()))?;
        file.write_all(csv_text.as_bytes())?;
        file.flush()?;
        Ok(csv_text.len())
    }

    /// Parse CSV text produced by `to_csv_string` back into cells
    pub fn parse_csv(text: &str, has_header: bool) -> Result<Vec<Vec<String>>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(has_header)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.context("Malformed CSV record")?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }

    /// Tab-separated text, one row per line, for clipboard copies
    pub fn to_tsv_text(rows: &[&StoredRow]) -> String {
        rows.iter()
            .map(|row| {
                row.record
                    .values()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
