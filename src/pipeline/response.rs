//! Response payload types and assembly.
//!
//! The payload shape (field names, casing, message strings) is a stable
//! contract consumed by existing clients; change it deliberately.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::db::DatabaseClient;

/// Outcome of a single statement in the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementStatus {
    Success,
    Error,
}

/// Per-statement entry in the response, in batch order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementResult {
    /// 1-based position in the batch.
    pub query_number: usize,

    pub status: StatementStatus,

    /// Human-readable outcome, prefixed with the rejection stage on error.
    pub message: String,

    /// The statement as received from the generator.
    pub query: String,

    /// Result rows for successful read-only statements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<serde_json::Map<String, serde_json::Value>>>,
}

impl StatementResult {
    /// Builds an error entry with the given stage-prefixed message.
    pub fn error(query_number: usize, query: &str, message: String) -> Self {
        Self {
            query_number,
            status: StatementStatus::Error,
            message,
            query: query.to_string(),
            results: None,
        }
    }

    /// Builds a success entry.
    pub fn success(
        query_number: usize,
        query: &str,
        message: String,
        results: Option<Vec<serde_json::Map<String, serde_json::Value>>>,
    ) -> Self {
        Self {
            query_number,
            status: StatementStatus::Success,
            message,
            query: query.to_string(),
            results,
        }
    }
}

/// Full contents of a mutated table, read after the batch finished.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSnapshot {
    pub table_name: String,
    pub data: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Complete response for one natural-language request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    /// "success" when every statement succeeded, "partial" otherwise.
    pub status: String,

    pub message: String,

    /// Per-statement outcomes, in generation order.
    pub queries: Vec<StatementResult>,

    /// Post-execution snapshots of mutated tables, in first-mutation order.
    pub modified_tables: Vec<TableSnapshot>,

    /// The raw model output the statements were parsed from.
    pub raw_gemini_response: String,

    /// The exact prompt sent to the model.
    pub full_prompt: String,
}

/// Assembles the batch response from statement outcomes and the list of
/// mutated tables.
///
/// Each mutated table is re-read in first-mutation order. A snapshot that
/// fails to read is logged and omitted; it never fails the response.
pub async fn assemble(
    results: Vec<StatementResult>,
    mutated_tables: Vec<String>,
    db: &dyn DatabaseClient,
) -> BatchResponse {
    let mut snapshots = Vec::with_capacity(mutated_tables.len());
    for table in mutated_tables {
        match db.select_all(&table).await {
            Ok(result) => snapshots.push(TableSnapshot {
                table_name: table,
                data: result.rows_as_maps(),
            }),
            Err(e) => {
                warn!("Failed to snapshot table '{}': {}", table, e);
            }
        }
    }

    let any_error = results
        .iter()
        .any(|r| r.status == StatementStatus::Error);

    let (status, message) = if any_error {
        (
            "partial".to_string(),
            "Some queries encountered errors. See details below.".to_string(),
        )
    } else {
        (
            "success".to_string(),
            "All queries executed successfully.".to_string(),
        )
    };

    BatchResponse {
        status,
        message,
        queries: results,
        modified_tables: snapshots,
        raw_gemini_response: String::new(),
        full_prompt: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MockDatabaseClient, Value};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_assemble_all_success() {
        let db = MockDatabaseClient::new();
        let results = vec![StatementResult::success(
            1,
            "SELECT 1",
            "Query executed successfully. Results displayed below.".to_string(),
            Some(vec![]),
        )];

        let response = assemble(results, vec![], &db).await;
        assert_eq!(response.status, "success");
        assert_eq!(response.message, "All queries executed successfully.");
        assert!(response.modified_tables.is_empty());
    }

    #[tokio::test]
    async fn test_assemble_partial_on_any_error() {
        let db = MockDatabaseClient::new();
        let results = vec![
            StatementResult::success(1, "SELECT 1", "ok".to_string(), None),
            StatementResult::error(2, "DELETE FROM t", "EXECUTION ERROR: boom".to_string()),
        ];

        let response = assemble(results, vec![], &db).await;
        assert_eq!(response.status, "partial");
        assert_eq!(
            response.message,
            "Some queries encountered errors. See details below."
        );
    }

    #[tokio::test]
    async fn test_assemble_snapshots_in_order() {
        let db = MockDatabaseClient::new();
        db.seed_table("b", &["id"], vec![vec![Value::Int(2)]]);
        db.seed_table("a", &["id"], vec![vec![Value::Int(1)]]);

        let response = assemble(vec![], vec!["b".to_string(), "a".to_string()], &db).await;
        let names: Vec<&str> = response
            .modified_tables
            .iter()
            .map(|s| s.table_name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(
            response.modified_tables[0].data[0].get("id"),
            Some(&serde_json::json!(2))
        );
    }

    #[tokio::test]
    async fn test_assemble_omits_unreadable_snapshot() {
        let db = MockDatabaseClient::new();
        db.seed_table("good", &["id"], vec![]);

        let response = assemble(
            vec![],
            vec!["missing".to_string(), "good".to_string()],
            &db,
        )
        .await;
        assert_eq!(response.modified_tables.len(), 1);
        assert_eq!(response.modified_tables[0].table_name, "good");
        // The response itself still succeeds.
        assert_eq!(response.status, "success");
    }

    #[test]
    fn test_payload_field_casing() {
        let result = StatementResult::success(1, "SELECT 1", "ok".to_string(), Some(vec![]));
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("queryNumber").is_some());
        assert_eq!(json["status"], "success");
        assert!(json.get("results").is_some());

        let no_results = StatementResult::error(1, "x", "msg".to_string());
        let json = serde_json::to_value(&no_results).unwrap();
        assert!(json.get("results").is_none());

        let snapshot = TableSnapshot {
            table_name: "users".to_string(),
            data: vec![],
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("tableName").is_some());
    }

    #[test]
    fn test_response_field_casing() {
        let response = BatchResponse {
            status: "success".to_string(),
            message: "m".to_string(),
            queries: vec![],
            modified_tables: vec![],
            raw_gemini_response: "raw".to_string(),
            full_prompt: "prompt".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("modifiedTables").is_some());
        assert!(json.get("rawGeminiResponse").is_some());
        assert!(json.get("fullPrompt").is_some());
    }
}
