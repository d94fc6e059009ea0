//! Snapshot table I/O.
//!
//! Snapshots are CSV files with a header row. Every cell is normalized on
//! the way in (see [`crate::normalize`]); a ragged record is a fatal
//! malformed-input error — matching never starts on a table that failed to
//! load cleanly.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{ReconError, Result};
use crate::normalize::normalize_cell;
use crate::row::{Row, Table};

/// Read a snapshot table from `path`.
pub fn read_table(path: &Path) -> Result<Table> {
    let file = File::open(path)?;
    read_table_from(file)
}

/// Read a snapshot table from any reader.
pub fn read_table_from<R: Read>(reader: R) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut table = Table::new(headers.clone());
    for (index, record) in csv_reader.records().enumerate() {
        // Header is line 1; the first data record is line 2.
        let record = record.map_err(|e| ReconError::MalformedRecord {
            line: index + 2,
            detail: e.to_string(),
        })?;

        let mut row = Row::default();
        for (column, cell) in headers.iter().zip(record.iter()) {
            row.set(column, normalize_cell(cell));
        }
        table.push(row);
    }
    Ok(table)
}

/// Write `table` to `path` as CSV.
pub fn write_table(path: &Path, table: &Table) -> Result<()> {
    let file = File::create(path)?;
    write_table_to(file, table)
}

/// Write `table` to any writer as CSV.
pub fn write_table_to<W: Write>(writer: W, table: &Table) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&table.columns)?;
    for row in &table.rows {
        csv_writer.write_record(table.columns.iter().map(|c| row.get(c)))?;
    }
    csv_writer.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
