use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Column names shared between the snapshot schema and the engine.
pub mod columns {
    pub const SEQUENCE_NAME: &str = "SequenceName";
    pub const EVENT_NAME: &str = "EventName";
    pub const STR_ORIGIN: &str = "StrOrigin";
    pub const CHARACTER_KEY: &str = "CharacterKey";
    pub const DIALOG_VOICE: &str = "DialogVoice";
    pub const SPEAKER_GROUP_KEY: &str = "Speaker-GroupKey";
    pub const DIALOG_TYPE: &str = "DialogType";

    pub const DESC: &str = "Desc";
    pub const START_FRAME: &str = "StartFrame";
    pub const END_FRAME: &str = "EndFrame";
    pub const GROUP: &str = "Group";

    pub const TEXT: &str = "Text";
    pub const STATUS: &str = "STATUS";
    pub const FREE_MEMO: &str = "FreeMemo";

    /// The seven columns the identity quadruple is derived from.
    pub const IDENTITY_INPUTS: [&str; 7] = [
        SEQUENCE_NAME,
        EVENT_NAME,
        STR_ORIGIN,
        CHARACTER_KEY,
        DIALOG_VOICE,
        SPEAKER_GROUP_KEY,
        DIALOG_TYPE,
    ];
}

/// Default character-group columns checked separately by the classifier.
pub fn default_group_columns() -> Vec<String> {
    ["Tribe", "Age", "Gender", "Job", "Region"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One dialogue line from a snapshot.
///
/// The seven identity-input columns get named fields so the identity
/// accessors are checked at compile time; every other column lives in
/// `extra`, keyed by header name. A row carries no stored identity — the
/// identity quadruple is always derived, never persisted.
///
/// All values are normalized strings (see [`crate::normalize`]); a missing
/// column reads as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    #[serde(rename = "SequenceName", default)]
    pub sequence: String,
    #[serde(rename = "EventName", default)]
    pub event: String,
    #[serde(rename = "StrOrigin", default)]
    pub origin: String,
    #[serde(rename = "CharacterKey", default)]
    pub character_key: String,
    #[serde(rename = "DialogVoice", default)]
    pub dialog_voice: String,
    #[serde(rename = "Speaker-GroupKey", default)]
    pub speaker_group_key: String,
    #[serde(rename = "DialogType", default)]
    pub dialog_type: String,
    /// Every other column, keyed by header name.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Row {
    /// Read a cell by column name. Unknown or absent columns read as `""`.
    pub fn get(&self, column: &str) -> &str {
        match column {
            columns::SEQUENCE_NAME => &self.sequence,
            columns::EVENT_NAME => &self.event,
            columns::STR_ORIGIN => &self.origin,
            columns::CHARACTER_KEY => &self.character_key,
            columns::DIALOG_VOICE => &self.dialog_voice,
            columns::SPEAKER_GROUP_KEY => &self.speaker_group_key,
            columns::DIALOG_TYPE => &self.dialog_type,
            other => self.extra.get(other).map(String::as_str).unwrap_or(""),
        }
    }

    /// Write a cell by column name, routing known names to the typed fields.
    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        let value = value.into();
        match column {
            columns::SEQUENCE_NAME => self.sequence = value,
            columns::EVENT_NAME => self.event = value,
            columns::STR_ORIGIN => self.origin = value,
            columns::CHARACTER_KEY => self.character_key = value,
            columns::DIALOG_VOICE => self.dialog_voice = value,
            columns::SPEAKER_GROUP_KEY => self.speaker_group_key = value,
            columns::DIALOG_TYPE => self.dialog_type = value,
            other => {
                self.extra.insert(other.to_string(), value);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// An ordered snapshot table: header list plus rows in file order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
