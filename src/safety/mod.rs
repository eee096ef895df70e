//! Statement safety checks.
//!
//! Classifies candidate SQL statements by their leading keyword and applies a
//! conservative validation pass before anything is sent to the database.

mod classify;
mod validate;

pub use classify::{classify, extract_target_table};
pub use validate::validate;

use std::fmt;

/// The kind of SQL statement, derived from its leading keyword.
///
/// `Other` covers DDL and anything unrecognized. Exactly one kind is assigned
/// per statement; classification never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// SELECT, SHOW, or DESCRIBE.
    ReadOnly,
    Insert,
    Update,
    Delete,
    /// DDL and anything unrecognized.
    Other,
}

impl StatementKind {
    /// Returns true for Insert, Update, and Delete.
    ///
    /// `Other` is not mutating for permission purposes, though DDL can still
    /// alter data or schema.
    pub fn is_mutating(&self) -> bool {
        matches!(self, Self::Insert | Self::Update | Self::Delete)
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadOnly => write!(f, "read-only"),
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
            Self::Other => write!(f, "other"),
        }
    }
}
