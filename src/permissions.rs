//! Per-statement permission gating.
//!
//! Decides whether a classified statement may proceed under the request's
//! run mode and allow-flags. Read-only statements always pass. Statements
//! classified as `Other` (DDL and unrecognized syntax) pass unconditionally
//! in write mode: they have no dedicated allow-flag. That gap is preserved
//! behavior, asserted by tests rather than silently closed.

use serde::{Deserialize, Serialize};

use crate::safety::StatementKind;

/// Run mode for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunMode {
    /// Only read-only statements may execute.
    #[default]
    #[serde(rename = "read-only")]
    ReadOnly,
    /// Write statements may execute, subject to the per-operation flags.
    #[serde(rename = "write")]
    Write,
}

impl RunMode {
    /// Returns the mode as a string for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadOnly => "read-only",
            Self::Write => "write",
        }
    }
}

/// Per-operation allow-flags, meaningful only in write mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermissionSet {
    pub allow_insert: bool,
    pub allow_update: bool,
    pub allow_delete: bool,
}

impl PermissionSet {
    /// A permission set with every flag enabled.
    pub fn allow_all() -> Self {
        Self {
            allow_insert: true,
            allow_update: true,
            allow_delete: true,
        }
    }
}

/// Checks whether a classified statement may proceed.
///
/// Returns `Err(reason)` when the statement is forbidden by the mode or
/// flags. Each rejection carries a distinct message naming the missing
/// permission.
pub fn check(kind: StatementKind, mode: RunMode, permissions: &PermissionSet) -> Result<(), String> {
    if kind == StatementKind::ReadOnly {
        return Ok(());
    }

    match mode {
        RunMode::ReadOnly => {
            Err("Write operations are disabled in Read-Only mode.".to_string())
        }
        RunMode::Write => match kind {
            StatementKind::Insert if !permissions.allow_insert => Err(
                "INSERT operations are not allowed based on your settings.".to_string(),
            ),
            StatementKind::Update if !permissions.allow_update => Err(
                "UPDATE operations are not allowed based on your settings.".to_string(),
            ),
            StatementKind::Delete if !permissions.allow_delete => Err(
                "DELETE operations are not allowed based on your settings.".to_string(),
            ),
            _ => Ok(()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_statement_always_permitted() {
        let none = PermissionSet::default();
        assert!(check(StatementKind::ReadOnly, RunMode::ReadOnly, &none).is_ok());
        assert!(check(StatementKind::ReadOnly, RunMode::Write, &none).is_ok());
        assert!(check(StatementKind::ReadOnly, RunMode::Write, &PermissionSet::allow_all()).is_ok());
    }

    #[test]
    fn test_read_only_mode_blocks_all_writes() {
        let all = PermissionSet::allow_all();
        for kind in [
            StatementKind::Insert,
            StatementKind::Update,
            StatementKind::Delete,
            StatementKind::Other,
        ] {
            let err = check(kind, RunMode::ReadOnly, &all).unwrap_err();
            assert_eq!(err, "Write operations are disabled in Read-Only mode.");
        }
    }

    #[test]
    fn test_write_mode_flags_gate_each_kind() {
        let none = PermissionSet::default();
        assert!(check(StatementKind::Insert, RunMode::Write, &none)
            .unwrap_err()
            .contains("INSERT"));
        assert!(check(StatementKind::Update, RunMode::Write, &none)
            .unwrap_err()
            .contains("UPDATE"));
        assert!(check(StatementKind::Delete, RunMode::Write, &none)
            .unwrap_err()
            .contains("DELETE"));
    }

    #[test]
    fn test_write_mode_flags_allow_each_kind() {
        let all = PermissionSet::allow_all();
        assert!(check(StatementKind::Insert, RunMode::Write, &all).is_ok());
        assert!(check(StatementKind::Update, RunMode::Write, &all).is_ok());
        assert!(check(StatementKind::Delete, RunMode::Write, &all).is_ok());
    }

    #[test]
    fn test_other_kind_unconditional_in_write_mode() {
        // DDL has no allow-flag; it passes even with everything disabled.
        let none = PermissionSet::default();
        assert!(check(StatementKind::Other, RunMode::Write, &none).is_ok());
    }

    #[test]
    fn test_mode_serde_round_trip() {
        assert_eq!(
            serde_json::from_str::<RunMode>("\"read-only\"").unwrap(),
            RunMode::ReadOnly
        );
        assert_eq!(
            serde_json::from_str::<RunMode>("\"write\"").unwrap(),
            RunMode::Write
        );
        assert!(serde_json::from_str::<RunMode>("\"yolo\"").is_err());
        assert_eq!(serde_json::to_string(&RunMode::Write).unwrap(), "\"write\"");
    }

    #[test]
    fn test_mode_as_str() {
        assert_eq!(RunMode::ReadOnly.as_str(), "read-only");
        assert_eq!(RunMode::Write.as_str(), "write");
    }
}
