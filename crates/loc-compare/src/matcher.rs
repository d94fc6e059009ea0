//! The two-pass row matcher.
//!
//! Matches every CURRENT row to at most one PREVIOUS row using the ten
//! identity-subset indexes, then assigns a single best-explanation label:
//!
//! 1. **Pass 1 (certainties)** — rows with a full 3-of-3
//!    (seq, event, origin) hit whose casting also matches are classified
//!    from their metadata diff alone; rows whose identity appears in none
//!    of the ten indexes are `New Row`. Both the row and its claimed
//!    previous index leave further consideration.
//! 2. **Pass 2 (heuristic resolution)** — the remaining rows walk a fixed
//!    branch priority, most-specific subset first. The first branch whose
//!    index hits an **unclaimed** previous row wins and claims it
//!    immediately; a hit on a claimed row falls through to the next branch.
//!
//! The claim set is a single `HashSet<usize>` threaded by mutable reference
//! through both passes — one previous index is claimed at most once per
//! run. Claims are greedy and final: a later row never steals an earlier
//! row's match, even when it would have explained it better.
//!
//! Previous rows never claimed by either pass are deletions.

use std::collections::HashSet;

use loc_core::casting::{compose_identity, IdentityKey};
use loc_core::row::Table;

use crate::classify::{
    contains_korean, diff_metadata, ChangeField, ChangeLabel, MetaDiff, SharedColumns,
};
use crate::lookup::PreviousLookups;

/// Presentation-only progress observer: `(rows_done, rows_total)`.
pub type ProgressFn = dyn Fn(usize, usize) + Sync;

/// How often (in rows) the progress observer fires within a pass.
const PROGRESS_INTERVAL: usize = 512;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The matcher's verdict for one current row.
#[derive(Debug, Clone)]
pub struct RowMatch {
    pub current_index: usize,
    /// Claimed previous row, `None` for `New Row`.
    pub previous_index: Option<usize>,
    pub label: ChangeLabel,
    /// Character-group sub-columns that changed; populated only for
    /// `Character Group Change` rows, used downstream for highlighting.
    pub group_changes: Vec<String>,
}

/// Output of both passes over the CURRENT table.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// One entry per current row, in input order.
    pub matches: Vec<RowMatch>,
    /// Previous rows never claimed by either pass, in original order.
    pub deleted: Vec<usize>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run both matching passes over `current` against `previous`.
pub fn match_tables(
    previous: &Table,
    current: &Table,
    shared: &SharedColumns,
    progress: Option<&ProgressFn>,
) -> MatchOutcome {
    let previous_keys: Vec<IdentityKey> = previous.rows.iter().map(compose_identity).collect();
    let current_keys: Vec<IdentityKey> = current.rows.iter().map(compose_identity).collect();
    let lookups = PreviousLookups::build(&previous_keys);

    let total = current.len();
    let mut claimed: HashSet<usize> = HashSet::new();

    // Pass 1: certainties only. Unresolved slots stay None for pass 2.
    let mut resolved: Vec<Option<RowMatch>> = Vec::with_capacity(total);
    for (index, key) in current_keys.iter().enumerate() {
        resolved.push(pass_one(
            index,
            key,
            previous,
            current,
            &previous_keys,
            &lookups,
            shared,
            &mut claimed,
        ));
        report_progress(progress, index + 1, total);
    }

    // Pass 2: heuristic resolution over whatever pass 1 left open.
    let mut matches: Vec<RowMatch> = Vec::with_capacity(total);
    for (index, slot) in resolved.into_iter().enumerate() {
        let row_match = match slot {
            Some(m) => m,
            None => pass_two(
                index,
                &current_keys[index],
                previous,
                current,
                &previous_keys,
                &lookups,
                shared,
                &mut claimed,
            ),
        };
        matches.push(row_match);
        report_progress(progress, index + 1, total);
    }

    let deleted: Vec<usize> = (0..previous.len())
        .filter(|j| !claimed.contains(j))
        .collect();

    MatchOutcome { matches, deleted }
}

// ---------------------------------------------------------------------------
// Pass 1
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn pass_one(
    index: usize,
    key: &IdentityKey,
    previous: &Table,
    current: &Table,
    previous_keys: &[IdentityKey],
    lookups: &PreviousLookups,
    shared: &SharedColumns,
    claimed: &mut HashSet<usize>,
) -> Option<RowMatch> {
    // Full identity match: seq/event/origin hit plus equal casting.
    if let Some(j) = lookups.by_seq_event_origin(key) {
        if previous_keys[j].casting == key.casting && !claimed.contains(&j) {
            let meta = diff_metadata(&current.rows[index], &previous.rows[j], shared);
            claimed.insert(j);
            return Some(from_meta(index, j, meta));
        }
    }

    // No subset of the identity appears anywhere: definitely new.
    if !lookups.appears_anywhere(key) {
        return Some(RowMatch {
            current_index: index,
            previous_index: None,
            label: ChangeLabel::NewRow,
            group_changes: Vec::new(),
        });
    }

    None
}

/// Label a fully-identity-matched pair from its metadata diff alone.
fn from_meta(current_index: usize, previous_index: usize, meta: MetaDiff) -> RowMatch {
    let label = if !meta.group_changed.is_empty() {
        ChangeLabel::CharacterGroupChange
    } else {
        ChangeLabel::composite(meta.changed)
    };
    RowMatch {
        current_index,
        previous_index: Some(previous_index),
        label,
        group_changes: meta.group_changed,
    }
}

// ---------------------------------------------------------------------------
// Pass 2
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn pass_two(
    index: usize,
    key: &IdentityKey,
    previous: &Table,
    current: &Table,
    previous_keys: &[IdentityKey],
    lookups: &PreviousLookups,
    shared: &SharedColumns,
    claimed: &mut HashSet<usize>,
) -> RowMatch {
    let cur = &current.rows[index];

    // Branch 1: same seq/event/origin, casting moved.
    if let Some(j) = unclaimed(lookups.by_seq_event_origin(key), claimed) {
        if previous_keys[j].casting != key.casting {
            let meta = diff_metadata(cur, &previous.rows[j], shared);
            claimed.insert(j);
            let mut fields = vec![ChangeField::CastingKey];
            fields.extend(meta.changed);
            return matched(index, j, ChangeLabel::composite(fields));
        }
    }

    // Branch 2: origin rewritten under a stable seq/event/casting.
    if let Some(j) = unclaimed(lookups.by_seq_event_casting(key), claimed) {
        if previous_keys[j].origin != key.origin {
            let meta = diff_metadata(cur, &previous.rows[j], shared);
            claimed.insert(j);
            let mut fields = vec![ChangeField::StrOrigin];
            fields.extend(meta.changed);
            return matched(index, j, ChangeLabel::composite(fields));
        }
    }

    // Branch 3: event renamed. Gated on Korean origin text — a pure-ASCII
    // origin shared by many rows is more likely a duplicate-value collision
    // than a rename.
    if let Some(j) = unclaimed(lookups.by_seq_origin_casting(key), claimed) {
        if previous_keys[j].event != key.event {
            claimed.insert(j);
            let label = if contains_korean(&key.origin) {
                ChangeLabel::composite(vec![ChangeField::EventName])
            } else {
                ChangeLabel::NoRelevantChange
            };
            return matched(index, j, label);
        }
    }

    // Branch 4: sequence renamed.
    if let Some(j) = unclaimed(lookups.by_event_origin_casting(key), claimed) {
        if previous_keys[j].sequence != key.sequence {
            claimed.insert(j);
            return matched(index, j, ChangeLabel::composite(vec![ChangeField::SequenceName]));
        }
    }

    // Branch 5: seq/event anchor — diff everything else.
    if let Some(j) = unclaimed(lookups.by_seq_event(key), claimed) {
        let prev_key = &previous_keys[j];
        let meta = diff_metadata(cur, &previous.rows[j], shared);
        claimed.insert(j);
        if !meta.group_changed.is_empty() {
            return RowMatch {
                current_index: index,
                previous_index: Some(j),
                label: ChangeLabel::CharacterGroupChange,
                group_changes: meta.group_changed,
            };
        }
        let mut fields = Vec::new();
        if prev_key.origin != key.origin {
            fields.push(ChangeField::StrOrigin);
        }
        if prev_key.casting != key.casting {
            fields.push(ChangeField::CastingKey);
        }
        fields.extend(meta.changed);
        return matched(index, j, ChangeLabel::composite(fields));
    }

    // Branch 6: origin/casting anchor — seq and/or event moved.
    if let Some(j) = unclaimed(lookups.by_origin_casting(key), claimed) {
        let prev_key = &previous_keys[j];
        claimed.insert(j);
        let mut fields = Vec::new();
        if prev_key.event != key.event {
            fields.push(ChangeField::EventName);
        }
        if prev_key.sequence != key.sequence {
            fields.push(ChangeField::SequenceName);
        }
        return matched(index, j, ChangeLabel::composite(fields));
    }

    // Branch 7: event/casting anchor — origin and/or seq moved.
    if let Some(j) = unclaimed(lookups.by_event_casting(key), claimed) {
        let prev_key = &previous_keys[j];
        claimed.insert(j);
        let mut fields = Vec::new();
        if prev_key.origin != key.origin {
            fields.push(ChangeField::StrOrigin);
        }
        if prev_key.sequence != key.sequence {
            fields.push(ChangeField::SequenceName);
        }
        return matched(index, j, ChangeLabel::composite(fields));
    }

    // Branch 8: seq/casting anchor. The label text is historical and fixed;
    // neither field is verified individually.
    if let Some(j) = unclaimed(lookups.by_seq_casting(key), claimed) {
        claimed.insert(j);
        return matched(
            index,
            j,
            ChangeLabel::fixed(vec![ChangeField::EventName, ChangeField::StrOrigin]),
        );
    }

    // Branch 9: seq/origin anchor, same Korean gate as branch 3.
    if let Some(j) = unclaimed(lookups.by_seq_origin(key), claimed) {
        let prev_key = &previous_keys[j];
        claimed.insert(j);
        let label = if contains_korean(&key.origin) {
            let mut fields = Vec::new();
            if prev_key.casting != key.casting {
                fields.push(ChangeField::CastingKey);
            }
            if prev_key.event != key.event {
                fields.push(ChangeField::EventName);
            }
            ChangeLabel::composite(fields)
        } else {
            ChangeLabel::NoRelevantChange
        };
        return matched(index, j, label);
    }

    // Branch 10: event/origin anchor. Fixed label; casting is not checked.
    if let Some(j) = unclaimed(lookups.by_event_origin(key), claimed) {
        claimed.insert(j);
        return matched(index, j, ChangeLabel::fixed(vec![ChangeField::SequenceName]));
    }

    // No unclaimed candidate under any key combination.
    RowMatch {
        current_index: index,
        previous_index: None,
        label: ChangeLabel::NewRow,
        group_changes: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn unclaimed(hit: Option<usize>, claimed: &HashSet<usize>) -> Option<usize> {
    hit.filter(|j| !claimed.contains(j))
}

fn matched(current_index: usize, previous_index: usize, label: ChangeLabel) -> RowMatch {
    RowMatch {
        current_index,
        previous_index: Some(previous_index),
        label,
        group_changes: Vec::new(),
    }
}

fn report_progress(progress: Option<&ProgressFn>, done: usize, total: usize) {
    if let Some(callback) = progress {
        if done % PROGRESS_INTERVAL == 0 || done == total {
            callback(done, total);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
