//! Prefix-based statement classification and target-table extraction.
//!
//! Classification looks only at the leading keyword of the trimmed,
//! lower-cased statement. This is deliberately not a SQL parser: the
//! functions here are the single seam where a real parser could be swapped
//! in later without touching the batch executor.

use regex::Regex;
use std::sync::OnceLock;

use super::StatementKind;

/// Classifies a SQL string by its leading keyword.
///
/// The lowered form is used only for matching; execution always uses the
/// original text. Pure function, always returns a value.
pub fn classify(sql: &str) -> StatementKind {
    let lowered = sql.trim().to_lowercase();

    if lowered.starts_with("select") || lowered.starts_with("show") || lowered.starts_with("describe")
    {
        StatementKind::ReadOnly
    } else if lowered.starts_with("insert") {
        StatementKind::Insert
    } else if lowered.starts_with("update") {
        StatementKind::Update
    } else if lowered.starts_with("delete") {
        StatementKind::Delete
    } else {
        StatementKind::Other
    }
}

fn insert_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)insert\s+into\s+[`"]?(\w+)[`"]?"#).expect("valid regex"))
}

fn update_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)update\s+[`"]?(\w+)[`"]?"#).expect("valid regex"))
}

fn delete_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)delete\s+from\s+[`"]?(\w+)[`"]?"#).expect("valid regex"))
}

/// Extracts the primary target table from a mutating statement.
///
/// Matches `INSERT INTO <name>`, `UPDATE <name>`, and `DELETE FROM <name>`,
/// with optional backtick or double-quote delimiters around the identifier.
/// Returns None when the statement does not have the expected shape; the
/// caller simply will not snapshot that table.
pub fn extract_target_table(sql: &str) -> Option<String> {
    let captures = match classify(sql) {
        StatementKind::Insert => insert_re().captures(sql),
        StatementKind::Update => update_re().captures(sql),
        StatementKind::Delete => delete_re().captures(sql),
        _ => None,
    };

    captures.map(|c| c[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_select() {
        assert_eq!(classify("SELECT * FROM users"), StatementKind::ReadOnly);
        assert_eq!(classify("  select 1"), StatementKind::ReadOnly);
    }

    #[test]
    fn test_classify_show_and_describe() {
        assert_eq!(classify("SHOW TABLES"), StatementKind::ReadOnly);
        assert_eq!(classify("DESCRIBE users"), StatementKind::ReadOnly);
    }

    #[test]
    fn test_classify_insert() {
        assert_eq!(
            classify("INSERT INTO users (name) VALUES ('x')"),
            StatementKind::Insert
        );
    }

    #[test]
    fn test_classify_update() {
        assert_eq!(classify("UPDATE users SET name = 'x'"), StatementKind::Update);
    }

    #[test]
    fn test_classify_delete() {
        assert_eq!(classify("DELETE FROM users WHERE id = 1"), StatementKind::Delete);
    }

    #[test]
    fn test_classify_ddl_is_other() {
        assert_eq!(classify("CREATE TABLE t (id INT)"), StatementKind::Other);
        assert_eq!(classify("DROP TABLE t"), StatementKind::Other);
        assert_eq!(classify("TRUNCATE TABLE t"), StatementKind::Other);
    }

    #[test]
    fn test_classify_case_insensitive() {
        assert_eq!(classify("InSeRt INTO t VALUES (1)"), StatementKind::Insert);
        assert_eq!(classify("sElEcT 1"), StatementKind::ReadOnly);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let sql = "UPDATE users SET active = false";
        assert_eq!(classify(sql), classify(sql));
    }

    #[test]
    fn test_extract_insert_table() {
        assert_eq!(
            extract_target_table("INSERT INTO orders (id) VALUES (1)"),
            Some("orders".to_string())
        );
    }

    #[test]
    fn test_extract_update_table_with_backticks() {
        assert_eq!(
            extract_target_table("UPDATE `users` SET x=1"),
            Some("users".to_string())
        );
    }

    #[test]
    fn test_extract_delete_table() {
        assert_eq!(
            extract_target_table("DELETE FROM logs WHERE id=5"),
            Some("logs".to_string())
        );
    }

    #[test]
    fn test_extract_none_for_read_only() {
        assert_eq!(extract_target_table("SELECT * FROM users"), None);
    }

    #[test]
    fn test_extract_none_for_malformed() {
        assert_eq!(extract_target_table("INSERT users VALUES (1)"), None);
        assert_eq!(extract_target_table("DELETE users"), None);
    }

    #[test]
    fn test_extract_is_idempotent() {
        let sql = "DELETE FROM logs";
        assert_eq!(extract_target_table(sql), extract_target_table(sql));
    }
}
