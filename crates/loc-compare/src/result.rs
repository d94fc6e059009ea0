//! Reconciliation result types — the structured output of the engine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classify::ChangeLabel;

// ---------------------------------------------------------------------------
// RowDelta
// ---------------------------------------------------------------------------

/// Classification of one current row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowDelta {
    /// Zero-based position in the CURRENT table.
    pub current_index: usize,
    /// Zero-based position of the claimed row in the PREVIOUS table;
    /// `None` for `New Row`.
    pub previous_index: Option<usize>,
    /// The change label, serialized as its rendered string.
    pub label: ChangeLabel,
    /// Character-group sub-columns that changed; empty unless the label is
    /// `Character Group Change`.
    pub group_changes: Vec<String>,
    /// Similarity ratio in [0.0, 1.0] between previous and current origin
    /// text; populated only for labels containing `StrOrigin` when
    /// annotation is enabled.
    pub origin_similarity: Option<f64>,
}

// ---------------------------------------------------------------------------
// ReconStats
// ---------------------------------------------------------------------------

/// Aggregate counts summarising a reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconStats {
    pub rows_previous: usize,
    pub rows_current: usize,
    /// Rows labeled `No Change`.
    pub unchanged: usize,
    /// Rows with a substantive change label (composites and
    /// `Character Group Change`).
    pub changed: usize,
    /// Rows labeled `No Relevant Change`.
    pub no_relevant: usize,
    /// Rows labeled `New Row`.
    pub new_rows: usize,
    /// Previous rows never claimed by either pass.
    pub deleted: usize,
}

// ---------------------------------------------------------------------------
// ReconResult
// ---------------------------------------------------------------------------

/// The top-level output of a single reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconResult {
    /// Stable unique identifier for this run (UUIDv4).
    pub run_id: Uuid,
    /// Wall-clock duration of the run in milliseconds.
    pub elapsed_ms: u64,
    pub stats: ReconStats,
    /// Per-row classifications in CURRENT input order.
    pub deltas: Vec<RowDelta>,
    /// Unclaimed previous-row indexes in original PREVIOUS order.
    pub deleted: Vec<usize>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
