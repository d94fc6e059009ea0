//! Import-logic resolver.
//!
//! Once a row is classified, exactly one carry-over rule decides which
//! translator-authored fields (`Text`, `Desc`, `STATUS`, `FreeMemo`)
//! survive from the previous snapshot onto the output row. The rules are
//! recording-status-aware: a line that was already recorded keeps its
//! translation even when the source text moved, while a line nobody
//! translated yet simply adopts the current row.
//!
//! Rules are checked first-match-wins; every branch yields a decision and
//! none can fail.

use loc_compare::classify::{ChangeField, ChangeLabel};
use loc_core::row::{columns, Row};

/// Sentinel marking a line that was never translated.
pub const NO_TRANSLATION: &str = "NO TRANSLATION";

// ---------------------------------------------------------------------------
// ImportDecision
// ---------------------------------------------------------------------------

/// Columns to copy from the previous row onto the output row.
/// An empty list means the current row is taken as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportDecision {
    pub preserve: Vec<&'static str>,
}

impl ImportDecision {
    pub fn preserves(&self, column: &str) -> bool {
        self.preserve.iter().any(|c| *c == column)
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Decide the carry-over rule for one classified row.
pub fn resolve_import(label: &ChangeLabel, previous: Option<&Row>) -> ImportDecision {
    let Some(prev) = previous else {
        // New Row (and anything else unmatched): current row as-is.
        return ImportDecision::default();
    };

    // A previous row alongside a New Row label cannot happen by
    // construction; the memo pass-through is defensive.
    if *label == ChangeLabel::NewRow {
        return decision(prev, &[]);
    }

    // Never translated: nothing worth preserving.
    if prev.get(columns::TEXT) == NO_TRANSLATION {
        return ImportDecision::default();
    }

    if label.contains(ChangeField::StrOrigin) {
        let status = prev.get(columns::STATUS);
        let text = prev.get(columns::TEXT);
        if !status.is_empty() {
            // Already recorded: keep the translation and its status; the
            // new origin is adopted from the current row.
            return decision(prev, &[columns::TEXT, columns::DESC, columns::STATUS]);
        }
        if !text.is_empty() {
            // Translation started but not recorded; keep the draft, leave
            // the status open.
            return decision(prev, &[columns::TEXT, columns::DESC]);
        }
        // Untouched line: take the current row.
        return decision(prev, &[]);
    }

    if label.is_exactly(ChangeField::Desc) {
        // Adopt the new Desc, keep translation and status.
        return decision(prev, &[columns::TEXT, columns::STATUS]);
    }

    // TimeFrame moves, cosmetic renames (EventName / SequenceName / No
    // Change / No Relevant Change) and every remaining label: pure metadata
    // motion — translation, description and status all survive.
    decision(prev, &[columns::TEXT, columns::DESC, columns::STATUS])
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Build a decision, appending the FreeMemo pass-through when the previous
/// row carries one.
fn decision(prev: &Row, fields: &[&'static str]) -> ImportDecision {
    let mut preserve: Vec<&'static str> = fields.to_vec();
    if !prev.get(columns::FREE_MEMO).is_empty() {
        preserve.push(columns::FREE_MEMO);
    }
    ImportDecision { preserve }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
