//! Output-table assembly.
//!
//! The output is the CURRENT table with two appended columns — `CHANGES`
//! (the rendered label) and `PreviousData` (a pipe-joined audit summary of
//! the matched previous row) — and with the import decision's preserved
//! columns copied over each row.

use loc_compare::result::ReconResult;
use loc_core::row::{columns, Row, Table};

use crate::import::resolve_import;

/// Appended column holding the rendered change label.
pub const CHANGES_COLUMN: &str = "CHANGES";
/// Appended column holding the previous-row audit summary.
pub const PREVIOUS_DATA_COLUMN: &str = "PreviousData";

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Pipe-joined audit summary of a previous row:
/// `StrOrigin|Text|STATUS|FreeMemo|StartFrame`.
pub fn previous_summary(prev: &Row) -> String {
    [
        prev.origin.as_str(),
        prev.get(columns::TEXT),
        prev.get(columns::STATUS),
        prev.get(columns::FREE_MEMO),
        prev.get(columns::START_FRAME),
    ]
    .join("|")
}

/// Assemble the augmented output table from a reconciliation result.
///
/// Rows come out in CURRENT input order; the import decision for each row's
/// label is applied before the audit columns are written.
pub fn build_output(previous: &Table, current: &Table, result: &ReconResult) -> Table {
    let mut out_columns = current.columns.clone();
    for appended in [CHANGES_COLUMN, PREVIOUS_DATA_COLUMN] {
        if !out_columns.iter().any(|c| c == appended) {
            out_columns.push(appended.to_string());
        }
    }

    let mut out = Table::new(out_columns);
    for delta in &result.deltas {
        let mut row = current.rows[delta.current_index].clone();
        let prev = delta.previous_index.map(|j| &previous.rows[j]);

        let decision = resolve_import(&delta.label, prev);
        if let Some(prev) = prev {
            for column in decision.preserve.iter().copied() {
                row.set(column, prev.get(column).to_string());
            }
        }

        row.set(CHANGES_COLUMN, delta.label.render());
        row.set(
            PREVIOUS_DATA_COLUMN,
            prev.map(previous_summary).unwrap_or_default(),
        );
        out.push(row);
    }
    out
}

/// The previous rows never claimed by either pass, as their own table.
pub fn deleted_rows_table(previous: &Table, result: &ReconResult) -> Table {
    let mut out = Table::new(previous.columns.clone());
    for &j in &result.deleted {
        out.push(previous.rows[j].clone());
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use loc_compare::classify::ChangeLabel;
    use loc_compare::engine::ReconEngine;

    fn make_row(seq: &str, event: &str, origin: &str, character: &str) -> Row {
        let mut row = Row::default();
        row.sequence = seq.to_string();
        row.event = event.to_string();
        row.origin = origin.to_string();
        row.character_key = character.to_string();
        row
    }

    fn make_table(rows: Vec<Row>) -> Table {
        let mut table_columns: Vec<String> = columns::IDENTITY_INPUTS
            .iter()
            .map(|s| s.to_string())
            .collect();
        for extra in [
            columns::DESC,
            columns::TEXT,
            columns::STATUS,
            columns::FREE_MEMO,
            columns::START_FRAME,
        ] {
            table_columns.push(extra.to_string());
        }
        Table {
            columns: table_columns,
            rows,
        }
    }

    fn reconcile(previous: &Table, current: &Table) -> ReconResult {
        ReconEngine::default()
            .reconcile(previous, current, None)
            .expect("reconcile")
    }

    #[test]
    fn output_appends_audit_columns_once() {
        let rows = vec![make_row("S1", "E1", "안녕", "Char_A")];
        let previous = make_table(rows.clone());
        let current = make_table(rows);
        let result = reconcile(&previous, &current);

        let out = build_output(&previous, &current, &result);
        assert!(out.has_column(CHANGES_COLUMN));
        assert!(out.has_column(PREVIOUS_DATA_COLUMN));
        assert_eq!(out.columns.len(), current.columns.len() + 2);
        assert_eq!(out.rows[0].get(CHANGES_COLUMN), "No Change");
    }

    #[test]
    fn previous_summary_is_pipe_joined() {
        let mut prev = make_row("S1", "E1", "안녕", "Char_A");
        prev.set(columns::TEXT, "Hello");
        prev.set(columns::STATUS, "Recorded");
        prev.set(columns::FREE_MEMO, "note");
        prev.set(columns::START_FRAME, "120");
        assert_eq!(previous_summary(&prev), "안녕|Hello|Recorded|note|120");
    }

    #[test]
    fn recorded_translation_survives_an_origin_rewrite() {
        let mut prev = make_row("S1", "E1", "안녕하세요", "Char_A");
        prev.set(columns::TEXT, "Hello there");
        prev.set(columns::STATUS, "Recorded");
        let cur = make_row("S1", "E1", "잘 가세요", "Char_A");

        let previous = make_table(vec![prev]);
        let current = make_table(vec![cur]);
        let result = reconcile(&previous, &current);
        assert_eq!(result.deltas[0].label.render(), "StrOrigin Change");

        let out = build_output(&previous, &current, &result);
        let row = &out.rows[0];
        // Translation and status carried over; new origin adopted.
        assert_eq!(row.get(columns::TEXT), "Hello there");
        assert_eq!(row.get(columns::STATUS), "Recorded");
        assert_eq!(row.origin, "잘 가세요");
        assert_eq!(row.get(CHANGES_COLUMN), "StrOrigin Change");
    }

    #[test]
    fn new_row_has_empty_previous_data() {
        let previous = make_table(vec![]);
        let current = make_table(vec![make_row("S1", "E1", "새 대사", "Char_A")]);
        let result = reconcile(&previous, &current);
        assert_eq!(result.deltas[0].label, ChangeLabel::NewRow);

        let out = build_output(&previous, &current, &result);
        assert_eq!(out.rows[0].get(PREVIOUS_DATA_COLUMN), "");
        assert_eq!(out.rows[0].get(CHANGES_COLUMN), "New Row");
    }

    #[test]
    fn unchanged_row_keeps_previous_translation() {
        let mut prev = make_row("S1", "E1", "안녕", "Char_A");
        prev.set(columns::TEXT, "Hi");
        prev.set(columns::STATUS, "Recorded");
        // Current snapshot lost the translator fields (fresh export).
        let cur = make_row("S1", "E1", "안녕", "Char_A");

        let previous = make_table(vec![prev]);
        let current = make_table(vec![cur]);
        let result = reconcile(&previous, &current);
        assert_eq!(result.deltas[0].label.render(), "No Change");

        let out = build_output(&previous, &current, &result);
        assert_eq!(out.rows[0].get(columns::TEXT), "Hi");
        assert_eq!(out.rows[0].get(columns::STATUS), "Recorded");
    }

    #[test]
    fn deleted_rows_table_keeps_schema_and_order() {
        let previous = make_table(vec![
            make_row("S1", "E1", "가", "Char_A"),
            make_row("S2", "E2", "나", "Char_B"),
            make_row("S3", "E3", "다", "Char_C"),
        ]);
        let current = make_table(vec![make_row("S2", "E2", "나", "Char_B")]);
        let result = reconcile(&previous, &current);

        let deleted = deleted_rows_table(&previous, &result);
        assert_eq!(deleted.columns, previous.columns);
        assert_eq!(deleted.len(), 2);
        assert_eq!(deleted.rows[0].origin, "가");
        assert_eq!(deleted.rows[1].origin, "다");
    }
}
