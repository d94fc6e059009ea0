//! End-to-end run orchestration.
//!
//! Load both snapshots → reconcile → resolve imports into the output
//! table → write artifacts → build the report → append the journal
//! record. All file reads happen before matching starts and all writes
//! after it finishes; any load error aborts the run with no partial
//! processing.

use std::path::PathBuf;

use log::{debug, info};

use loc_compare::engine::{ReconConfig, ReconEngine};
use loc_compare::matcher::ProgressFn;
use loc_compare::result::ReconResult;
use loc_core::error::Result;
use loc_core::hash::table_fingerprint;
use loc_core::io::{read_table, write_table};
use loc_core::row::default_group_columns;
use loc_merge::output::{build_output, deleted_rows_table};

use crate::history::{RunJournal, RunRecord};
use crate::report::{build_report, label_histogram, ReconReport};

// ---------------------------------------------------------------------------
// RunOptions / RunSummary
// ---------------------------------------------------------------------------

/// Everything one reconciliation run needs.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub previous_path: PathBuf,
    pub current_path: PathBuf,
    pub output_path: PathBuf,
    /// Append a [`RunRecord`] here when set.
    pub journal_path: Option<PathBuf>,
    /// Write unclaimed previous rows here when set.
    pub deleted_path: Option<PathBuf>,
    pub group_columns: Vec<String>,
    pub annotate_similarity: bool,
}

impl RunOptions {
    pub fn new(
        previous_path: impl Into<PathBuf>,
        current_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            previous_path: previous_path.into(),
            current_path: current_path.into(),
            output_path: output_path.into(),
            journal_path: None,
            deleted_path: None,
            group_columns: default_group_columns(),
            annotate_similarity: true,
        }
    }
}

/// What a completed run hands back to the caller.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub result: ReconResult,
    pub report: ReconReport,
    /// The journal record, when a journal path was configured.
    pub record: Option<RunRecord>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Execute one full reconciliation run.
pub fn run(options: &RunOptions, progress: Option<&ProgressFn>) -> Result<RunSummary> {
    info!(
        "loading snapshots: previous={} current={}",
        options.previous_path.display(),
        options.current_path.display()
    );
    let previous = read_table(&options.previous_path)?;
    let current = read_table(&options.current_path)?;
    debug!(
        "loaded {} previous rows, {} current rows",
        previous.len(),
        current.len()
    );

    let engine = ReconEngine::new(ReconConfig {
        group_columns: options.group_columns.clone(),
        annotate_similarity: options.annotate_similarity,
    });
    let result = engine.reconcile(&previous, &current, progress)?;
    info!(
        "run {}: {} unchanged, {} changed, {} new, {} deleted in {} ms",
        result.run_id,
        result.stats.unchanged,
        result.stats.changed + result.stats.no_relevant,
        result.stats.new_rows,
        result.stats.deleted,
        result.elapsed_ms
    );

    let output = build_output(&previous, &current, &result);
    write_table(&options.output_path, &output)?;
    if let Some(deleted_path) = &options.deleted_path {
        write_table(deleted_path, &deleted_rows_table(&previous, &result))?;
    }

    let report = build_report(&previous, &current, &result);

    let record = match &options.journal_path {
        Some(journal_path) => {
            let record = RunRecord::new(
                table_fingerprint(&previous),
                table_fingerprint(&current),
                options.output_path.display().to_string(),
                label_histogram(&result),
            );
            RunJournal::new(journal_path).append(&record)?;
            debug!("journal record {} appended", record.id);
            Some(record)
        }
        None => None,
    };

    Ok(RunSummary {
        result,
        report,
        record,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
