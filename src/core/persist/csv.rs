//! CSV output
//!
//! Every field is quoted. The header is written only when the file is
//! created or replaced, so appended runs never repeat it.

use crate::domain::context::ResultExt;
use crate::domain::{ColumnSet, FlatRow, Result, VulnexError};
use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// How rows reach the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the file: header plus rows
    Overwrite,
    /// Add rows after the existing ones; header only if the file is empty
    Append,
}

/// Text form of one cell
///
/// Null is empty, strings are written as-is, everything else as compact JSON
/// (`true`, `8.5`, `["CVE-1","CVE-2"]`).
pub fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Writes flattened rows to one CSV file
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
    columns: ColumnSet,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>, columns: ColumnSet) -> Self {
        Self {
            path: path.into(),
            columns,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `rows` in order and return how many were written
    ///
    /// Overwrites go through a temporary file in the same directory that
    /// replaces the target only once every row is written.
    pub fn write(&self, rows: &[FlatRow], mode: WriteMode) -> Result<usize> {
        let written = match mode {
            WriteMode::Overwrite => self.overwrite(rows),
            WriteMode::Append => self.append(rows),
        }
        .with_context(|| format!("Failed to write {}", self.path.display()))?;

        tracing::info!(
            path = %self.path.display(),
            rows = written,
            mode = ?mode,
            "Data written to CSV"
        );
        Ok(written)
    }

    fn overwrite(&self, rows: &[FlatRow]) -> Result<usize> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let temp = NamedTempFile::new_in(parent)?;

        let temp = write_rows(temp, &self.columns, rows, true)?;
        temp.persist(&self.path)
            .map_err(|e| VulnexError::Io(e.error.to_string()))?;
        Ok(rows.len())
    }

    fn append(&self, rows: &[FlatRow]) -> Result<usize> {
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let needs_header = file.metadata()?.len() == 0;

        write_rows(file, &self.columns, rows, needs_header)?;
        Ok(rows.len())
    }
}

fn write_rows<W: Write>(sink: W, columns: &ColumnSet, rows: &[FlatRow], header: bool) -> Result<W> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(BufWriter::new(sink));

    if header {
        writer.write_record(columns.names())?;
    }

    for row in rows {
        if row.len() != columns.len() {
            return Err(VulnexError::Csv(format!(
                "row has {} cells, expected {}",
                row.len(),
                columns.len()
            )));
        }
        writer.write_record(row.cells().iter().map(render_cell))?;
    }

    let buffered = writer
        .into_inner()
        .map_err(|e| VulnexError::Csv(format!("Failed to flush CSV writer: {}", e.error())))?;
    buffered
        .into_inner()
        .map_err(|e| VulnexError::Io(format!("Failed to flush buffer: {}", e.error())))
}

/// Number of data rows (header excluded) in a CSV file
pub fn count_rows(path: &Path) -> Result<u64> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    count_rows_in(file)
}

/// Number of data rows (header excluded) in CSV text from any reader
pub fn count_rows_in<R: Read>(reader: R) -> Result<u64> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut count = 0u64;
    let mut record = csv::ByteRecord::new();
    while reader.read_byte_record(&mut record)? {
        count += 1;
    }
    Ok(count)
}
