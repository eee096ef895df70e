//! Conservative statement validation.
//!
//! Applied to every candidate statement before classification or execution.
//! The denylist check is substring-based and intentionally lossy: a
//! legitimate identifier containing "union" is rejected too. That tradeoff
//! is documented behavior, not a bug.

/// Tokens that cause a statement to be rejected, case-insensitively.
const DENYLIST: &[&str] = &[
    "--", "/*", "UNION", "DROP", "TRUNCATE", "ALTER", "GRANT", "REVOKE", "EXEC", "xp_",
];

/// Validates a single candidate statement.
///
/// Returns `Err(reason)` when the statement is rejected:
/// 1. A `;` anywhere except the very end looks like chained statements.
/// 2. Any denylist token found as a case-insensitive substring.
///
/// Never panics; pure function.
pub fn validate(sql: &str) -> Result<(), String> {
    if sql.contains(';') && !sql.ends_with(';') {
        return Err("Multiple SQL statements are not allowed.".to_string());
    }

    let lowered = sql.to_lowercase();
    for token in DENYLIST {
        if lowered.contains(&token.to_lowercase()) {
            return Err(format!(
                "Potentially harmful SQL pattern detected: {token}"
            ));
        }
    }

    Ok(())
}
