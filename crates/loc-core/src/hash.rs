use sha2::{Digest, Sha256};

use crate::row::Table;

/// Generic SHA256 helper — returns a lowercase hex-encoded digest.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Fingerprint of a table's normalized content.
///
/// Hashes the header list and every cell in column order, with unit
/// separators between cells so adjacent values cannot collide. Used as the
/// input/output artifact identifier in the run journal.
pub fn table_fingerprint(table: &Table) -> String {
    let mut hasher = Sha256::new();
    hasher.update(table.columns.join("\u{1f}").as_bytes());
    hasher.update(b"\n");
    for row in &table.rows {
        for column in &table.columns {
            hasher.update(row.get(column).as_bytes());
            hasher.update([0x1f]);
        }
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Row;

    #[test]
    fn sha256_hex_known_vector() {
        // SHA-256("") = e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
        assert_eq!(
            sha256_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    fn one_row_table(origin: &str) -> Table {
        let mut table = Table::new(vec!["SequenceName".to_string(), "StrOrigin".to_string()]);
        let mut row = Row::default();
        row.sequence = "S1".to_string();
        row.origin = origin.to_string();
        table.push(row);
        table
    }

    #[test]
    fn fingerprint_is_deterministic() {
        assert_eq!(
            table_fingerprint(&one_row_table("안녕")),
            table_fingerprint(&one_row_table("안녕"))
        );
    }

    #[test]
    fn fingerprint_detects_cell_change() {
        assert_ne!(
            table_fingerprint(&one_row_table("안녕")),
            table_fingerprint(&one_row_table("잘 가"))
        );
    }

    #[test]
    fn fingerprint_is_lowercase_hex() {
        let fp = table_fingerprint(&one_row_table("x"));
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
