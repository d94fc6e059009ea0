use serde::{Deserialize, Serialize};

use crate::row::Row;

/// Sentinel returned when no casting source field yields a usable key.
pub const CASTING_NOT_FOUND: &str = "not found";

/// Derive the voice-casting fingerprint for one row.
///
/// Priority cascade, first match wins; the result is always lowercase:
///
/// 1. `DialogType` in {`aidialog`, `questdialog`} → `DialogVoice`
///    (AI/quest lines are cast per voice asset, not per character), or the
///    sentinel when the voice is empty.
/// 2. `DialogVoice` contains `unique_` → `DialogVoice`.
/// 3. `CharacterKey` appears inside `Speaker-GroupKey` (both non-empty) →
///    `Speaker-GroupKey`.
/// 4. `CharacterKey` non-empty → `CharacterKey`.
/// 5. Otherwise → the sentinel.
///
/// CastingKey is NOT unique per row — the same character speaking different
/// lines shares one key. Pure function, never fails.
pub fn compute_casting_key(
    character_key: &str,
    dialog_voice: &str,
    speaker_group_key: &str,
    dialog_type: &str,
) -> String {
    let dialog_type = dialog_type.to_lowercase();
    let voice = dialog_voice.to_lowercase();

    if dialog_type == "aidialog" || dialog_type == "questdialog" {
        if voice.is_empty() {
            return CASTING_NOT_FOUND.to_string();
        }
        return voice;
    }

    if voice.contains("unique_") {
        return voice;
    }

    let character = character_key.to_lowercase();
    let group = speaker_group_key.to_lowercase();
    if !character.is_empty() && !group.is_empty() && group.contains(&character) {
        return group;
    }
    if !character.is_empty() {
        return character;
    }

    CASTING_NOT_FOUND.to_string()
}

// ---------------------------------------------------------------------------
// IdentityKey
// ---------------------------------------------------------------------------

/// The identity quadruple driving row matching: (sequence, event, origin,
/// casting). Derived per row, never stored in the snapshot itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityKey {
    pub sequence: String,
    pub event: String,
    pub origin: String,
    pub casting: String,
}

/// Compose the identity quadruple for `row`.
pub fn compose_identity(row: &Row) -> IdentityKey {
    IdentityKey {
        sequence: row.sequence.clone(),
        event: row.event.clone(),
        origin: row.origin.clone(),
        casting: compute_casting_key(
            &row.character_key,
            &row.dialog_voice,
            &row.speaker_group_key,
            &row.dialog_type,
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialog_type_override_uses_voice() {
        assert_eq!(
            compute_casting_key("Char_A", "Voice_Quest_01", "Group_B", "QuestDialog"),
            "voice_quest_01"
        );
        assert_eq!(
            compute_casting_key("Char_A", "Voice_Ai_02", "Group_B", "AiDialog"),
            "voice_ai_02"
        );
    }

    #[test]
    fn dialog_type_override_with_empty_voice_is_sentinel() {
        assert_eq!(
            compute_casting_key("Char_A", "", "Group_B", "aidialog"),
            CASTING_NOT_FOUND
        );
    }

    #[test]
    fn unique_voice_override() {
        assert_eq!(
            compute_casting_key("Char_A", "Unique_Merchant", "Group_B", "Cinematic"),
            "unique_merchant"
        );
    }

    #[test]
    fn character_in_group_takes_the_group() {
        assert_eq!(
            compute_casting_key("guard", "", "City_Guard_East", "Cinematic"),
            "city_guard_east"
        );
    }

    #[test]
    fn character_fallback() {
        assert_eq!(
            compute_casting_key("Hero_Main", "", "Villagers", "Cinematic"),
            "hero_main"
        );
    }

    #[test]
    fn all_empty_is_sentinel() {
        assert_eq!(compute_casting_key("", "", "", ""), CASTING_NOT_FOUND);
    }

    #[test]
    fn result_is_always_lowercase() {
        for key in [
            compute_casting_key("CHAR", "", "", ""),
            compute_casting_key("", "UNIQUE_NPC", "", ""),
            compute_casting_key("a", "V", "", "AIDIALOG"),
        ] {
            assert_eq!(key, key.to_lowercase());
        }
    }

    #[test]
    fn composition_is_deterministic() {
        let mut row = Row::default();
        row.sequence = "S1".to_string();
        row.event = "E1".to_string();
        row.origin = "대사".to_string();
        row.character_key = "Char_A".to_string();

        let first = compose_identity(&row);
        let second = compose_identity(&row);
        assert_eq!(first, second);
        assert_eq!(first.casting, "char_a");
    }
}
