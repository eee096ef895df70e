//! Error types for db-relay.
//!
//! `RelayError` splits along the seam the response contract cares about:
//! `Query` errors belong to a single statement and are folded into the
//! batch payload as `EXECUTION ERROR: ...` entries, while `Connection`,
//! `Llm`, and `Config` failures happen before or outside statement
//! execution and abort the whole request (the binary reports them as a
//! top-level `SERVER ERROR` payload).

use thiserror::Error;

/// Main error type for relay operations.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Could not reach or authenticate with the database. Always
    /// request-fatal; no statement runs without a connection.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The engine rejected a statement (bad SQL, unknown table, constraint
    /// violation, timeout). Carries the engine's message verbatim so the
    /// per-statement result can show it unchanged.
    #[error("Query error: {0}")]
    Query(String),

    /// The model API failed (auth, rate limit, network). Request-fatal:
    /// without generated statements there is no batch to run.
    #[error("LLM error: {0}")]
    Llm(String),

    /// Bad config file, connection string, or provider name.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A state this crate should never reach.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RelayError {
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Short category label for log lines.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Llm(_) => "LLM Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using RelayError.
pub type Result<T> = std::result::Result<T, RelayError>;
