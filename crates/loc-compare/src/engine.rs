//! Reconciliation engine front-end.
//!
//! [`ReconEngine`] is the primary entry point. It validates the identity
//! schema, runs the two-pass matcher (sequential — the claim set is shared
//! mutable state), then assembles per-row deltas in parallel with rayon and
//! restores input order afterwards. Rows whose label contains `StrOrigin`
//! are annotated with a character-level similarity ratio between the old
//! and new origin text, for analyst review of rewrites.

use std::time::Instant;

use rayon::prelude::*;
use similar::TextDiff;
use uuid::Uuid;

use loc_core::error::{ReconError, Result};
use loc_core::row::{columns, default_group_columns, Table};

use crate::classify::{ChangeField, SharedColumns};
use crate::matcher::{match_tables, ProgressFn, RowMatch};
use crate::result::{ReconResult, ReconStats, RowDelta};

// ---------------------------------------------------------------------------
// ReconConfig
// ---------------------------------------------------------------------------

/// Runtime configuration for the engine.
#[derive(Debug, Clone)]
pub struct ReconConfig {
    /// Character-group columns checked separately by the classifier.
    pub group_columns: Vec<String>,
    /// Annotate StrOrigin-changed rows with an origin similarity ratio.
    pub annotate_similarity: bool,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            group_columns: default_group_columns(),
            annotate_similarity: true,
        }
    }
}

// ---------------------------------------------------------------------------
// ReconEngine
// ---------------------------------------------------------------------------

/// Deterministic snapshot-reconciliation engine.
pub struct ReconEngine {
    config: ReconConfig,
}

impl ReconEngine {
    pub fn new(config: ReconConfig) -> Self {
        Self { config }
    }

    /// Reconcile `current` against `previous` and produce a [`ReconResult`].
    ///
    /// # Steps
    /// 1. Require the identity-input columns in both tables.
    /// 2. Run the two-pass matcher.
    /// 3. Build a [`RowDelta`] per current row in parallel, annotating
    ///    origin similarity where the label contains `StrOrigin`.
    /// 4. Compute aggregate stats and record elapsed wall-clock time.
    pub fn reconcile(
        &self,
        previous: &Table,
        current: &Table,
        progress: Option<&ProgressFn>,
    ) -> Result<ReconResult> {
        let start = Instant::now();

        require_identity_columns(previous, "previous")?;
        require_identity_columns(current, "current")?;

        let shared = SharedColumns::between(previous, current, &self.config.group_columns);
        let outcome = match_tables(previous, current, &shared, progress);

        // Delta assembly is pure per-row work; parallelise it and restore
        // input order afterwards.
        let mut indexed: Vec<(usize, RowDelta)> = outcome
            .matches
            .par_iter()
            .map(|m| (m.current_index, self.build_delta(m, previous, current)))
            .collect();
        indexed.sort_by_key(|(i, _)| *i);
        let deltas: Vec<RowDelta> = indexed.into_iter().map(|(_, d)| d).collect();

        let stats = compute_stats(&deltas, previous.len(), current.len(), outcome.deleted.len());
        let elapsed_ms = start.elapsed().as_millis() as u64;

        Ok(ReconResult {
            run_id: Uuid::new_v4(),
            elapsed_ms,
            stats,
            deltas,
            deleted: outcome.deleted,
        })
    }

    fn build_delta(&self, m: &RowMatch, previous: &Table, current: &Table) -> RowDelta {
        let origin_similarity = match m.previous_index {
            Some(j) if self.config.annotate_similarity
                && m.label.contains(ChangeField::StrOrigin) =>
            {
                Some(origin_similarity(
                    &previous.rows[j].origin,
                    &current.rows[m.current_index].origin,
                ))
            }
            _ => None,
        };

        RowDelta {
            current_index: m.current_index,
            previous_index: m.previous_index,
            label: m.label.clone(),
            group_changes: m.group_changes.clone(),
            origin_similarity,
        }
    }
}

impl Default for ReconEngine {
    fn default() -> Self {
        Self::new(ReconConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Character-level similarity ratio in [0.0, 1.0] between two origin texts.
pub fn origin_similarity(previous: &str, current: &str) -> f64 {
    if previous.is_empty() && current.is_empty() {
        return 1.0;
    }
    TextDiff::from_chars(previous, current).ratio() as f64
}

fn require_identity_columns(table: &Table, which: &str) -> Result<()> {
    for column in columns::IDENTITY_INPUTS {
        if !table.has_column(column) {
            return Err(ReconError::MissingColumn(format!(
                "{which} snapshot: {column}"
            )));
        }
    }
    Ok(())
}

fn compute_stats(
    deltas: &[RowDelta],
    rows_previous: usize,
    rows_current: usize,
    deleted: usize,
) -> ReconStats {
    use crate::classify::ChangeLabel;

    let mut unchanged = 0usize;
    let mut changed = 0usize;
    let mut no_relevant = 0usize;
    let mut new_rows = 0usize;

    for delta in deltas {
        match &delta.label {
            ChangeLabel::NoChange => unchanged += 1,
            ChangeLabel::NoRelevantChange => no_relevant += 1,
            ChangeLabel::NewRow => new_rows += 1,
            ChangeLabel::CharacterGroupChange | ChangeLabel::FieldChange(_) => changed += 1,
        }
    }

    ReconStats {
        rows_previous,
        rows_current,
        unchanged,
        changed,
        no_relevant,
        new_rows,
        deleted,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use loc_core::row::Row;

    fn make_row(seq: &str, event: &str, origin: &str, character: &str) -> Row {
        let mut row = Row::default();
        row.sequence = seq.to_string();
        row.event = event.to_string();
        row.origin = origin.to_string();
        row.character_key = character.to_string();
        row
    }

    fn make_table(rows: Vec<Row>) -> Table {
        Table {
            columns: columns::IDENTITY_INPUTS.iter().map(|s| s.to_string()).collect(),
            rows,
        }
    }

    #[test]
    fn reconcile_identical_tables() {
        let rows = vec![
            make_row("S1", "E1", "안녕", "Char_A"),
            make_row("S1", "E2", "잘 가", "Char_B"),
        ];
        let previous = make_table(rows.clone());
        let current = make_table(rows);

        let engine = ReconEngine::default();
        let result = engine.reconcile(&previous, &current, None).expect("reconcile");
        assert_eq!(result.stats.unchanged, 2);
        assert_eq!(result.stats.changed, 0);
        assert_eq!(result.stats.new_rows, 0);
        assert_eq!(result.stats.deleted, 0);
        assert_ne!(result.run_id, Uuid::nil());
    }

    #[test]
    fn reconcile_counts_each_outcome() {
        let previous = make_table(vec![
            make_row("S1", "E1", "안녕", "Char_A"),
            make_row("S2", "E2", "잘 가", "Char_B"),
        ]);
        let current = make_table(vec![
            make_row("S1", "E1", "안녕", "Char_A"),
            make_row("S9", "E9", "새로운 대사", "Char_Z"),
        ]);

        let result = ReconEngine::default()
            .reconcile(&previous, &current, None)
            .expect("reconcile");
        assert_eq!(result.stats.unchanged, 1);
        assert_eq!(result.stats.new_rows, 1);
        assert_eq!(result.stats.deleted, 1);
        // Accounting identity.
        assert_eq!(
            result.stats.rows_current as i64 - result.stats.rows_previous as i64,
            result.stats.new_rows as i64 - result.stats.deleted as i64
        );
    }

    #[test]
    fn origin_change_gets_similarity_annotation() {
        let previous = make_table(vec![make_row("S1", "E1", "안녕하세요 여러분", "Char_A")]);
        let current = make_table(vec![make_row("S1", "E1", "안녕하세요 모두들", "Char_A")]);

        let result = ReconEngine::default()
            .reconcile(&previous, &current, None)
            .expect("reconcile");
        let delta = &result.deltas[0];
        assert!(delta.label.contains(ChangeField::StrOrigin));
        let ratio = delta.origin_similarity.expect("similarity should be set");
        assert!(ratio > 0.0 && ratio < 1.0, "partial rewrite: got {ratio}");
    }

    #[test]
    fn similarity_annotation_can_be_disabled() {
        let previous = make_table(vec![make_row("S1", "E1", "안녕", "Char_A")]);
        let current = make_table(vec![make_row("S1", "E1", "잘 가", "Char_A")]);

        let engine = ReconEngine::new(ReconConfig {
            annotate_similarity: false,
            ..ReconConfig::default()
        });
        let result = engine.reconcile(&previous, &current, None).expect("reconcile");
        assert!(result.deltas[0].origin_similarity.is_none());
    }

    #[test]
    fn unchanged_rows_have_no_similarity() {
        let rows = vec![make_row("S1", "E1", "안녕", "Char_A")];
        let result = ReconEngine::default()
            .reconcile(&make_table(rows.clone()), &make_table(rows), None)
            .expect("reconcile");
        assert!(result.deltas[0].origin_similarity.is_none());
    }

    #[test]
    fn missing_identity_column_is_rejected() {
        let previous = make_table(vec![]);
        let mut current = make_table(vec![]);
        current.columns.retain(|c| c != columns::DIALOG_TYPE);

        let result = ReconEngine::default().reconcile(&previous, &current, None);
        assert!(
            matches!(result, Err(ReconError::MissingColumn(_))),
            "expected MissingColumn, got {result:?}"
        );
    }

    #[test]
    fn parallel_assembly_preserves_input_order() {
        let rows: Vec<Row> = (0..40)
            .map(|i| make_row(&format!("S{i}"), &format!("E{i}"), &format!("대사 {i}"), "Char_A"))
            .collect();
        let result = ReconEngine::default()
            .reconcile(&make_table(rows.clone()), &make_table(rows), None)
            .expect("reconcile");
        for (i, delta) in result.deltas.iter().enumerate() {
            assert_eq!(delta.current_index, i);
        }
    }

    #[test]
    fn origin_similarity_bounds() {
        assert_eq!(origin_similarity("", ""), 1.0);
        assert_eq!(origin_similarity("같다", "같다"), 1.0);
        assert_eq!(origin_similarity("abc", "xyz"), 0.0);
    }
}
