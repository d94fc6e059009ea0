//! Cell-level normalization applied to every value read from a snapshot.
//!
//! Spreadsheet exports carry three classes of noise that would otherwise
//! defeat exact-match comparison: stray whitespace, textual null artifacts
//! (`NaN`, `None`, `null`), and numeric cells rendered with a spurious
//! decimal tail (`12.0` for an integer sequence number). All three are
//! collapsed here, once, at load time — every downstream comparison works
//! on normalized strings only.

/// Normalize a single raw cell value.
pub fn normalize_cell(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || is_null_artifact(trimmed) {
        return String::new();
    }
    if let Some(stripped) = strip_numeric_artifact(trimmed) {
        return stripped;
    }
    trimmed.to_string()
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn is_null_artifact(value: &str) -> bool {
    value.eq_ignore_ascii_case("nan")
        || value.eq_ignore_ascii_case("none")
        || value.eq_ignore_ascii_case("null")
}

/// Strip a trailing zero/decimal tail from a numeric-looking value.
///
/// Returns `None` when the value is not a plain decimal literal (text,
/// version strings like `v1.0`, scientific notation) — such values pass
/// through untouched.
fn strip_numeric_artifact(value: &str) -> Option<String> {
    if !value.contains('.') {
        return None;
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.' || c == '-' || c == '+')
    {
        return None;
    }
    if value.parse::<f64>().is_err() {
        return None;
    }
    let stripped = value.trim_end_matches('0').trim_end_matches('.');
    if stripped.is_empty() || stripped == "-" || stripped == "+" {
        return Some("0".to_string());
    }
    Some(stripped.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(normalize_cell("  hello  "), "hello");
        assert_eq!(normalize_cell("\tworld\n"), "world");
    }

    #[test]
    fn null_artifacts_collapse_to_empty() {
        for artifact in ["NaN", "nan", "None", "NONE", "null", "Null", ""] {
            assert_eq!(normalize_cell(artifact), "", "artifact: {artifact:?}");
        }
    }

    #[test]
    fn numeric_decimal_tail_is_stripped() {
        assert_eq!(normalize_cell("12.0"), "12");
        assert_eq!(normalize_cell("3.50"), "3.5");
        assert_eq!(normalize_cell("0.0"), "0");
        assert_eq!(normalize_cell("100."), "100");
        assert_eq!(normalize_cell("-7.0"), "-7");
    }

    #[test]
    fn integers_pass_through() {
        assert_eq!(normalize_cell("42"), "42");
        assert_eq!(normalize_cell("-42"), "-42");
    }

    #[test]
    fn non_numeric_values_keep_their_dots() {
        assert_eq!(normalize_cell("v1.0"), "v1.0");
        assert_eq!(normalize_cell("1.0e5"), "1.0e5");
        assert_eq!(normalize_cell("a.b.c"), "a.b.c");
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(normalize_cell("안녕하세요"), "안녕하세요");
        assert_eq!(normalize_cell("Hello, world"), "Hello, world");
    }
}
