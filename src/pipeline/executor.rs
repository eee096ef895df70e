//! Sequential batch execution.
//!
//! Every statement runs through the same gauntlet: validation, then
//! classification and permission checks, then execution. A failure never
//! short-circuits the batch; later statements still run.

use tracing::{debug, info};

use crate::db::DatabaseClient;
use crate::permissions::{self, PermissionSet, RunMode};
use crate::pipeline::response::StatementResult;
use crate::safety::{classify, extract_target_table, validate, StatementKind};

/// Runs a batch of statements in order, returning per-statement outcomes
/// and the tables touched by mutating statements.
///
/// A mutating statement's target table is recorded once it passes the
/// permission gate, before execution, so a failed INSERT still gets its
/// table snapshotted. Tables are recorded once each, in first-touch order.
pub async fn run_batch(
    statements: &[String],
    mode: RunMode,
    permissions: &PermissionSet,
    db: &dyn DatabaseClient,
) -> (Vec<StatementResult>, Vec<String>) {
    let mut results = Vec::with_capacity(statements.len());
    let mut mutated_tables: Vec<String> = Vec::new();

    for (index, statement) in statements.iter().enumerate() {
        let query_number = index + 1;
        debug!("Executing statement {} of {}", query_number, statements.len());

        if let Err(reason) = validate(statement) {
            results.push(StatementResult::error(
                query_number,
                statement,
                format!("VALIDATION ERROR: {reason}"),
            ));
            continue;
        }

        let kind = classify(statement);

        if let Err(reason) = permissions::check(kind, mode, permissions) {
            results.push(StatementResult::error(
                query_number,
                statement,
                format!("PERMISSION ERROR: {reason}"),
            ));
            continue;
        }

        if kind.is_mutating() {
            if let Some(table) = extract_target_table(statement) {
                if !mutated_tables.contains(&table) {
                    mutated_tables.push(table);
                }
            }
        }

        match db.execute_query(statement).await {
            Ok(result) => {
                let (message, rows) = if kind == StatementKind::ReadOnly {
                    let message = if result.is_empty() {
                        "No data found for your query.".to_string()
                    } else {
                        "Query executed successfully. Results displayed below.".to_string()
                    };
                    (message, Some(result.rows_as_maps()))
                } else {
                    ("Database updated successfully.".to_string(), None)
                };
                results.push(StatementResult::success(
                    query_number,
                    statement,
                    message,
                    rows,
                ));
            }
            Err(e) => {
                info!("Statement {} failed: {}", query_number, e);
                results.push(StatementResult::error(
                    query_number,
                    statement,
                    format!("EXECUTION ERROR: {e}"),
                ));
            }
        }
    }

    (results, mutated_tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MockDatabaseClient, Value};
    use crate::pipeline::response::StatementStatus;
    use pretty_assertions::assert_eq;

    fn stmts(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_validation_failure_does_not_stop_batch() {
        let db = MockDatabaseClient::new();
        db.seed_table("users", &["id"], vec![vec![Value::Int(1)]]);

        let (results, _) = run_batch(
            &stmts(&["SELECT 1; SELECT 2", "SELECT * FROM users"]),
            RunMode::ReadOnly,
            &PermissionSet::default(),
            &db,
        )
        .await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].status, StatementStatus::Error);
        assert_eq!(
            results[0].message,
            "VALIDATION ERROR: Multiple SQL statements are not allowed."
        );
        assert_eq!(results[1].status, StatementStatus::Success);
    }

    #[tokio::test]
    async fn test_query_numbers_are_one_based_batch_order() {
        let db = MockDatabaseClient::new();
        db.seed_table("users", &["id"], vec![]);

        let (results, _) = run_batch(
            &stmts(&["SELECT * FROM users", "SELECT * FROM users"]),
            RunMode::ReadOnly,
            &PermissionSet::default(),
            &db,
        )
        .await;

        assert_eq!(results[0].query_number, 1);
        assert_eq!(results[1].query_number, 2);
    }

    #[tokio::test]
    async fn test_permission_rejection_in_read_only_mode() {
        let db = MockDatabaseClient::new();
        db.seed_table("users", &["id"], vec![]);

        let (results, mutated) = run_batch(
            &stmts(&["DELETE FROM users"]),
            RunMode::ReadOnly,
            &PermissionSet::allow_all(),
            &db,
        )
        .await;

        assert_eq!(
            results[0].message,
            "PERMISSION ERROR: Write operations are disabled in Read-Only mode."
        );
        // Rejected statements never register their target table.
        assert!(mutated.is_empty());
    }

    #[tokio::test]
    async fn test_read_only_success_messages() {
        let db = MockDatabaseClient::new();
        db.seed_table("users", &["id"], vec![vec![Value::Int(1)]]);
        db.seed_table("empty", &["id"], vec![]);

        let (results, _) = run_batch(
            &stmts(&["SELECT * FROM users", "SELECT * FROM empty"]),
            RunMode::ReadOnly,
            &PermissionSet::default(),
            &db,
        )
        .await;

        assert_eq!(
            results[0].message,
            "Query executed successfully. Results displayed below."
        );
        assert_eq!(results[0].results.as_ref().unwrap().len(), 1);
        assert_eq!(results[1].message, "No data found for your query.");
        assert_eq!(results[1].results.as_ref().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_write_success_message_and_no_results() {
        let db = MockDatabaseClient::new();
        db.seed_table("users", &["id"], vec![]);

        let (results, mutated) = run_batch(
            &stmts(&["INSERT INTO users VALUES (1)"]),
            RunMode::Write,
            &PermissionSet::allow_all(),
            &db,
        )
        .await;

        assert_eq!(results[0].status, StatementStatus::Success);
        assert_eq!(results[0].message, "Database updated successfully.");
        assert!(results[0].results.is_none());
        assert_eq!(mutated, vec!["users".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_insert_still_records_table() {
        let db = MockDatabaseClient::new();
        db.seed_table("users", &["id"], vec![]);
        db.fail_matching("INSERT INTO users");

        let (results, mutated) = run_batch(
            &stmts(&["INSERT INTO users VALUES (1)"]),
            RunMode::Write,
            &PermissionSet::allow_all(),
            &db,
        )
        .await;

        assert_eq!(results[0].status, StatementStatus::Error);
        assert!(results[0].message.starts_with("EXECUTION ERROR: "));
        // Table tracking happens before execution.
        assert_eq!(mutated, vec!["users".to_string()]);
    }

    #[tokio::test]
    async fn test_mutated_tables_dedup_first_touch_order() {
        let db = MockDatabaseClient::new();
        db.seed_table("a", &["id"], vec![]);
        db.seed_table("b", &["id"], vec![]);

        let (_, mutated) = run_batch(
            &stmts(&[
                "INSERT INTO b VALUES (1)",
                "INSERT INTO a VALUES (1)",
                "DELETE FROM b",
            ]),
            RunMode::Write,
            &PermissionSet::allow_all(),
            &db,
        )
        .await;

        assert_eq!(mutated, vec!["b".to_string(), "a".to_string()]);
    }

    #[tokio::test]
    async fn test_ddl_passes_write_mode_without_flags() {
        let db = MockDatabaseClient::new();

        let (results, mutated) = run_batch(
            &stmts(&["CREATE TABLE t (id INT)"]),
            RunMode::Write,
            &PermissionSet::default(),
            &db,
        )
        .await;

        assert_eq!(results[0].status, StatementStatus::Success);
        assert_eq!(results[0].message, "Database updated successfully.");
        // DDL is not classified as mutating, so no snapshot is taken.
        assert!(mutated.is_empty());
    }

    #[tokio::test]
    async fn test_flag_gated_rejection_message() {
        let db = MockDatabaseClient::new();
        db.seed_table("users", &["id"], vec![]);

        let (results, _) = run_batch(
            &stmts(&["INSERT INTO users VALUES (1)"]),
            RunMode::Write,
            &PermissionSet::default(),
            &db,
        )
        .await;

        assert_eq!(
            results[0].message,
            "PERMISSION ERROR: INSERT operations are not allowed based on your settings."
        );
    }
}
