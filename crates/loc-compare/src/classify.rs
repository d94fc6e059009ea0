//! Change-label vocabulary and the field-difference classifier.
//!
//! Composite labels are built from a fixed field vocabulary joined by `+`
//! in a canonical order — priority by typical importance, not alphabetical.
//! The order is a hard invariant: downstream tooling string-matches the
//! rendered labels, so `StrOrigin+Desc+TimeFrame Change` must never come
//! out as any other permutation.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use loc_core::error::ReconError;
use loc_core::row::{columns, Row, Table};

// ---------------------------------------------------------------------------
// ChangeField
// ---------------------------------------------------------------------------

/// One member of the composite-label vocabulary.
///
/// Variant declaration order IS the canonical composite order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChangeField {
    StrOrigin,
    CastingKey,
    EventName,
    SequenceName,
    Desc,
    TimeFrame,
    DialogType,
    Group,
}

impl ChangeField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeField::StrOrigin => "StrOrigin",
            ChangeField::CastingKey => "CastingKey",
            ChangeField::EventName => "EventName",
            ChangeField::SequenceName => "SequenceName",
            ChangeField::Desc => "Desc",
            ChangeField::TimeFrame => "TimeFrame",
            ChangeField::DialogType => "DialogType",
            ChangeField::Group => "Group",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, ReconError> {
        match s {
            "StrOrigin" => Ok(ChangeField::StrOrigin),
            "CastingKey" => Ok(ChangeField::CastingKey),
            "EventName" => Ok(ChangeField::EventName),
            "SequenceName" => Ok(ChangeField::SequenceName),
            "Desc" => Ok(ChangeField::Desc),
            "TimeFrame" => Ok(ChangeField::TimeFrame),
            "DialogType" => Ok(ChangeField::DialogType),
            "Group" => Ok(ChangeField::Group),
            other => Err(ReconError::InvalidInput(format!(
                "unknown change field: {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// ChangeLabel
// ---------------------------------------------------------------------------

/// The classification assigned to one current row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeLabel {
    NoChange,
    NoRelevantChange,
    NewRow,
    CharacterGroupChange,
    /// Composite of changed fields; rendered as `"A+B Change"`.
    FieldChange(Vec<ChangeField>),
}

impl ChangeLabel {
    /// Build a composite from the differing fields, sorted into canonical
    /// order and deduplicated. An empty field set is `No Change`.
    pub fn composite(mut fields: Vec<ChangeField>) -> ChangeLabel {
        if fields.is_empty() {
            return ChangeLabel::NoChange;
        }
        fields.sort();
        fields.dedup();
        ChangeLabel::FieldChange(fields)
    }

    /// Fixed-label constructor preserving the given field order verbatim.
    /// Used by the matcher branches whose label text is historical and must
    /// not be re-sorted.
    pub fn fixed(fields: Vec<ChangeField>) -> ChangeLabel {
        ChangeLabel::FieldChange(fields)
    }

    pub fn contains(&self, field: ChangeField) -> bool {
        match self {
            ChangeLabel::FieldChange(fields) => fields.contains(&field),
            _ => false,
        }
    }

    /// True when the label is a composite of exactly this one field.
    pub fn is_exactly(&self, field: ChangeField) -> bool {
        matches!(self, ChangeLabel::FieldChange(fields) if fields.as_slice() == [field])
    }

    pub fn render(&self) -> String {
        match self {
            ChangeLabel::NoChange => "No Change".to_string(),
            ChangeLabel::NoRelevantChange => "No Relevant Change".to_string(),
            ChangeLabel::NewRow => "New Row".to_string(),
            ChangeLabel::CharacterGroupChange => "Character Group Change".to_string(),
            ChangeLabel::FieldChange(fields) => {
                let joined: Vec<&str> = fields.iter().map(ChangeField::as_str).collect();
                format!("{} Change", joined.join("+"))
            }
        }
    }

    pub fn parse(s: &str) -> Result<ChangeLabel, ReconError> {
        match s {
            "No Change" => return Ok(ChangeLabel::NoChange),
            "No Relevant Change" => return Ok(ChangeLabel::NoRelevantChange),
            "New Row" => return Ok(ChangeLabel::NewRow),
            "Character Group Change" => return Ok(ChangeLabel::CharacterGroupChange),
            _ => {}
        }
        let composite = s.strip_suffix(" Change").ok_or_else(|| {
            ReconError::InvalidInput(format!("unknown change label: {s}"))
        })?;
        let fields = composite
            .split('+')
            .map(ChangeField::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        if fields.is_empty() {
            return Err(ReconError::InvalidInput(format!(
                "unknown change label: {s}"
            )));
        }
        Ok(ChangeLabel::FieldChange(fields))
    }
}

impl std::fmt::Display for ChangeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

impl Serialize for ChangeLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.render())
    }
}

impl<'de> Deserialize<'de> for ChangeLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ChangeLabel::parse(&s).map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Shared columns
// ---------------------------------------------------------------------------

/// Metadata columns present in both schemas. Columns missing from either
/// side are excluded from diffing — never an error.
#[derive(Debug, Clone)]
pub struct SharedColumns {
    pub desc: bool,
    pub start_frame: bool,
    pub end_frame: bool,
    pub dialog_type: bool,
    pub group: bool,
    /// Character-group columns present in both tables.
    pub group_columns: Vec<String>,
}

impl SharedColumns {
    pub fn between(previous: &Table, current: &Table, group_columns: &[String]) -> Self {
        let both = |name: &str| previous.has_column(name) && current.has_column(name);
        SharedColumns {
            desc: both(columns::DESC),
            start_frame: both(columns::START_FRAME),
            end_frame: both(columns::END_FRAME),
            dialog_type: both(columns::DIALOG_TYPE),
            group: both(columns::GROUP),
            group_columns: group_columns
                .iter()
                .filter(|c| both(c))
                .cloned()
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Metadata diff
// ---------------------------------------------------------------------------

/// Result of comparing the shared metadata columns of a matched row pair.
#[derive(Debug, Clone, Default)]
pub struct MetaDiff {
    /// Differing members of {Desc, TimeFrame, DialogType, Group}, already in
    /// canonical order.
    pub changed: Vec<ChangeField>,
    /// Character-group sub-columns that differ. Any entry here overrides the
    /// generic composite with `Character Group Change`.
    pub group_changed: Vec<String>,
}

/// Compare every shared metadata column of `current` against `previous`
/// using normalized-string equality.
pub fn diff_metadata(current: &Row, previous: &Row, shared: &SharedColumns) -> MetaDiff {
    let mut changed = Vec::new();

    if shared.desc && current.get(columns::DESC) != previous.get(columns::DESC) {
        changed.push(ChangeField::Desc);
    }
    let frames_moved = (shared.start_frame
        && current.get(columns::START_FRAME) != previous.get(columns::START_FRAME))
        || (shared.end_frame
            && current.get(columns::END_FRAME) != previous.get(columns::END_FRAME));
    if frames_moved {
        changed.push(ChangeField::TimeFrame);
    }
    if shared.dialog_type && current.dialog_type != previous.dialog_type {
        changed.push(ChangeField::DialogType);
    }
    if shared.group && current.get(columns::GROUP) != previous.get(columns::GROUP) {
        changed.push(ChangeField::Group);
    }

    let group_changed = shared
        .group_columns
        .iter()
        .filter(|c| current.get(c) != previous.get(c))
        .cloned()
        .collect();

    MetaDiff {
        changed,
        group_changed,
    }
}

// ---------------------------------------------------------------------------
// Korean script detection
// ---------------------------------------------------------------------------

/// True when `text` contains Hangul syllables or Jamo.
///
/// The matcher gates two of its weakest heuristics on this: a match whose
/// origin is pure Latin/ASCII (codes, placeholders) is far more likely to be
/// a duplicate-value collision than a real rename.
pub fn contains_korean(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(
            c,
            '\u{AC00}'..='\u{D7A3}'       // Hangul syllables
                | '\u{1100}'..='\u{11FF}' // Jamo
                | '\u{3130}'..='\u{318F}' // compatibility Jamo
                | '\u{A960}'..='\u{A97F}' // Jamo extended-A
                | '\u{D7B0}'..='\u{D7FF}' // Jamo extended-B
        )
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
