//! Aggregate reporting over a reconciliation result.
//!
//! Read-only downstream consumer of the matcher's output: a count-by-label
//! histogram with origin word counts, plus a word-migration matrix showing
//! how many words moved from one group to another between the snapshots
//! (and the same matrix rolled up to super groups). None of this feeds back
//! into matching.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use loc_compare::result::ReconResult;
use loc_core::row::{columns, Table};

/// Pseudo-label used for unclaimed previous rows in histograms.
pub const DELETED_ROWS_LABEL: &str = "Deleted Rows";

/// Whitespace-delimited word count of an origin text.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

// ---------------------------------------------------------------------------
// SuperGroup
// ---------------------------------------------------------------------------

/// Coarse categorical bucket derived from Group/DialogType. Used only by
/// reporting, never by matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuperGroup {
    MainChapters,
    Factions,
    QuestAiDialog,
    Other,
}

impl SuperGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuperGroup::MainChapters => "Main Chapters",
            SuperGroup::Factions => "Factions",
            SuperGroup::QuestAiDialog => "Quest/AI Dialog",
            SuperGroup::Other => "Other",
        }
    }
}

/// Bucket a row by its group and dialog type.
pub fn super_group(group: &str, dialog_type: &str) -> SuperGroup {
    let dialog_type = dialog_type.to_lowercase();
    if dialog_type == "aidialog" || dialog_type == "questdialog" {
        return SuperGroup::QuestAiDialog;
    }
    let group = group.to_lowercase();
    if group.starts_with("chapter") || group.starts_with("main") {
        return SuperGroup::MainChapters;
    }
    if group.contains("faction") {
        return SuperGroup::Factions;
    }
    SuperGroup::Other
}

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Row and origin-word totals for one label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub rows: usize,
    pub words: usize,
}

/// Origin words that moved from one bucket to another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Migration {
    pub from: String,
    pub to: String,
    pub words: usize,
}

/// The full aggregate report for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconReport {
    pub labels: Vec<LabelCount>,
    pub group_migrations: Vec<Migration>,
    pub super_group_migrations: Vec<Migration>,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Count-by-label histogram, including the deleted pseudo-label.
pub fn label_histogram(result: &ReconResult) -> BTreeMap<String, usize> {
    let mut histogram: BTreeMap<String, usize> = BTreeMap::new();
    for delta in &result.deltas {
        *histogram.entry(delta.label.render()).or_insert(0) += 1;
    }
    histogram.insert(DELETED_ROWS_LABEL.to_string(), result.deleted.len());
    histogram
}

/// Build the aggregate report for one run.
pub fn build_report(previous: &Table, current: &Table, result: &ReconResult) -> ReconReport {
    // Per-label rows and words. Current rows count their current origin;
    // deleted rows count the origin that disappeared.
    let mut by_label: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for delta in &result.deltas {
        let words = word_count(&current.rows[delta.current_index].origin);
        let entry = by_label.entry(delta.label.render()).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += words;
    }
    let deleted_entry = by_label.entry(DELETED_ROWS_LABEL.to_string()).or_insert((0, 0));
    for &j in &result.deleted {
        deleted_entry.0 += 1;
        deleted_entry.1 += word_count(&previous.rows[j].origin);
    }
    let labels = by_label
        .into_iter()
        .map(|(label, (rows, words))| LabelCount { label, rows, words })
        .collect();

    // Word migration across matched rows whose group moved.
    let mut group_words: BTreeMap<(String, String), usize> = BTreeMap::new();
    let mut super_words: BTreeMap<(SuperGroup, SuperGroup), usize> = BTreeMap::new();
    for delta in &result.deltas {
        let Some(j) = delta.previous_index else {
            continue;
        };
        let prev_row = &previous.rows[j];
        let cur_row = &current.rows[delta.current_index];
        let prev_group = prev_row.get(columns::GROUP);
        let cur_group = cur_row.get(columns::GROUP);
        let words = word_count(&cur_row.origin);

        if prev_group != cur_group {
            *group_words
                .entry((prev_group.to_string(), cur_group.to_string()))
                .or_insert(0) += words;
        }

        let prev_super = super_group(prev_group, &prev_row.dialog_type);
        let cur_super = super_group(cur_group, &cur_row.dialog_type);
        if prev_super != cur_super {
            *super_words.entry((prev_super, cur_super)).or_insert(0) += words;
        }
    }

    let group_migrations = group_words
        .into_iter()
        .map(|((from, to), words)| Migration { from, to, words })
        .collect();
    let super_group_migrations = super_words
        .into_iter()
        .map(|((from, to), words)| Migration {
            from: from.as_str().to_string(),
            to: to.as_str().to_string(),
            words,
        })
        .collect();

    ReconReport {
        labels,
        group_migrations,
        super_group_migrations,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use loc_compare::engine::ReconEngine;
    use loc_core::row::Row;

    fn make_row(seq: &str, event: &str, origin: &str, character: &str, group: &str) -> Row {
        let mut row = Row::default();
        row.sequence = seq.to_string();
        row.event = event.to_string();
        row.origin = origin.to_string();
        row.character_key = character.to_string();
        row.set(columns::GROUP, group);
        row
    }

    fn make_table(rows: Vec<Row>) -> Table {
        let mut table_columns: Vec<String> = columns::IDENTITY_INPUTS
            .iter()
            .map(|s| s.to_string())
            .collect();
        table_columns.push(columns::GROUP.to_string());
        Table {
            columns: table_columns,
            rows,
        }
    }

    #[test]
    fn word_count_splits_on_whitespace() {
        assert_eq!(word_count("안녕하세요 여러분 반갑습니다"), 3);
        assert_eq!(word_count("  spaced   out  "), 2);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn super_group_buckets() {
        assert_eq!(super_group("Chapter_03", "Cinematic"), SuperGroup::MainChapters);
        assert_eq!(super_group("Main_Story", ""), SuperGroup::MainChapters);
        assert_eq!(super_group("West_Faction_Camp", ""), SuperGroup::Factions);
        assert_eq!(super_group("anything", "AiDialog"), SuperGroup::QuestAiDialog);
        assert_eq!(super_group("anything", "questdialog"), SuperGroup::QuestAiDialog);
        assert_eq!(super_group("Sidequests", ""), SuperGroup::Other);
    }

    #[test]
    fn dialog_type_outranks_group_in_super_grouping() {
        assert_eq!(super_group("Chapter_01", "aidialog"), SuperGroup::QuestAiDialog);
    }

    #[test]
    fn histogram_counts_labels_and_deletions() {
        let previous = make_table(vec![
            make_row("S1", "E1", "안녕", "Char_A", "Chapter_01"),
            make_row("S2", "E2", "잘 가", "Char_B", "Chapter_01"),
        ]);
        let current = make_table(vec![make_row("S1", "E1", "안녕", "Char_A", "Chapter_01")]);
        let result = ReconEngine::default()
            .reconcile(&previous, &current, None)
            .expect("reconcile");

        let histogram = label_histogram(&result);
        assert_eq!(histogram["No Change"], 1);
        assert_eq!(histogram[DELETED_ROWS_LABEL], 1);
    }

    #[test]
    fn report_counts_words_per_label() {
        let previous = make_table(vec![make_row("S1", "E1", "안녕 친구", "Char_A", "G1")]);
        let current = make_table(vec![
            make_row("S1", "E1", "안녕 친구", "Char_A", "G1"),
            make_row("S9", "E9", "하나 둘 셋", "Char_Z", "G1"),
        ]);
        let result = ReconEngine::default()
            .reconcile(&previous, &current, None)
            .expect("reconcile");

        let report = build_report(&previous, &current, &result);
        let new_row = report
            .labels
            .iter()
            .find(|l| l.label == "New Row")
            .expect("New Row entry");
        assert_eq!(new_row.rows, 1);
        assert_eq!(new_row.words, 3);
    }

    #[test]
    fn group_move_lands_in_the_migration_matrix() {
        let previous = make_table(vec![make_row("S1", "E1", "안녕 친구 여러분", "Char_A", "Chapter_01")]);
        let current = make_table(vec![make_row("S1", "E1", "안녕 친구 여러분", "Char_A", "West_Faction")]);
        let result = ReconEngine::default()
            .reconcile(&previous, &current, None)
            .expect("reconcile");

        let report = build_report(&previous, &current, &result);
        assert_eq!(report.group_migrations.len(), 1);
        let migration = &report.group_migrations[0];
        assert_eq!(migration.from, "Chapter_01");
        assert_eq!(migration.to, "West_Faction");
        assert_eq!(migration.words, 3);

        assert_eq!(report.super_group_migrations.len(), 1);
        assert_eq!(report.super_group_migrations[0].from, "Main Chapters");
        assert_eq!(report.super_group_migrations[0].to, "Factions");
    }

    #[test]
    fn stable_groups_produce_no_migrations() {
        let rows = vec![make_row("S1", "E1", "안녕", "Char_A", "Chapter_01")];
        let previous = make_table(rows.clone());
        let current = make_table(rows);
        let result = ReconEngine::default()
            .reconcile(&previous, &current, None)
            .expect("reconcile");

        let report = build_report(&previous, &current, &result);
        assert!(report.group_migrations.is_empty());
        assert!(report.super_group_migrations.is_empty());
    }
}
