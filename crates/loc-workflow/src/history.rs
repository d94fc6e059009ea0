//! Append-only run journal.
//!
//! One JSON record per completed run, appended as a line to a JSON Lines
//! file. The engine never reads the journal — it is write-only telemetry;
//! `read_all` exists for tooling and tests.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use loc_core::error::Result;

// ---------------------------------------------------------------------------
// RunRecord
// ---------------------------------------------------------------------------

/// Immutable record of one completed reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: Uuid,
    /// UTC timestamp when the record was written.
    pub recorded_at: DateTime<Utc>,
    /// Fingerprint of the PREVIOUS snapshot.
    pub previous_artifact: String,
    /// Fingerprint of the CURRENT snapshot.
    pub current_artifact: String,
    /// Identifier of the written output artifact (its path).
    pub output_artifact: String,
    /// Count-by-label histogram, including `Deleted Rows`.
    pub labels: BTreeMap<String, usize>,
}

impl RunRecord {
    pub fn new(
        previous_artifact: impl Into<String>,
        current_artifact: impl Into<String>,
        output_artifact: impl Into<String>,
        labels: BTreeMap<String, usize>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            previous_artifact: previous_artifact.into(),
            current_artifact: current_artifact.into(),
            output_artifact: output_artifact.into(),
            labels,
        }
    }
}

// ---------------------------------------------------------------------------
// RunJournal
// ---------------------------------------------------------------------------

/// Handle on a JSON Lines journal file.
pub struct RunJournal {
    path: PathBuf,
}

impl RunJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record. The file is created on first use; existing
    /// records are never rewritten.
    pub fn append(&self, record: &RunRecord) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(record)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    /// Read every record in append order. A journal that does not exist
    /// yet reads as empty.
    pub fn read_all(&self) -> Result<Vec<RunRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&self.path)?;
        let mut records = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }
        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
