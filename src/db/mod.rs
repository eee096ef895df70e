//! Database abstraction layer for db-relay.
//!
//! Provides a trait-based interface for database operations, allowing
//! different database backends to be used interchangeably.

mod mock;
mod mysql;
mod schema;
mod types;

pub use mock::{FailingDatabaseClient, MockDatabaseClient};
pub use mysql::MySqlClient;
pub use schema::{Column, Schema, SchemaSnapshot, Table};
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::config::ConnectionConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Creates a database client for the given configuration.
///
/// This is the central factory function for database connections.
pub async fn connect(config: &ConnectionConfig) -> Result<Box<dyn DatabaseClient>> {
    let client = MySqlClient::connect(config).await?;
    Ok(Box::new(client))
}

/// Trait defining the interface for database clients.
///
/// All database operations are async and return Results with RelayError.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Introspects the database schema, returning table and column information.
    async fn fetch_schema(&self) -> Result<Schema>;

    /// Executes a SQL statement and returns the results.
    async fn execute_query(&self, sql: &str) -> Result<QueryResult>;

    /// Reads an entire table (`SELECT *`), used for post-mutation snapshots.
    async fn select_all(&self, table: &str) -> Result<QueryResult>;

    /// Fetches up to `limit` sample rows from a table, for prompt context.
    async fn sample_rows(&self, table: &str, limit: u32) -> Result<QueryResult>;

    /// Closes the database connection.
    async fn close(&self) -> Result<()>;
}

/// Fetches a fresh, timestamped schema snapshot.
///
/// Refresh is an explicit operation returning a new value; nothing global
/// is mutated.
pub async fn snapshot_schema(db: &dyn DatabaseClient) -> Result<SchemaSnapshot> {
    let schema = db.fetch_schema().await?;
    Ok(SchemaSnapshot::now(schema))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_snapshot_schema_uses_client() {
        let client = MockDatabaseClient::new();
        client
            .execute_query("CREATE TABLE users (id INT, name VARCHAR(50))")
            .await
            .unwrap();

        let snapshot = snapshot_schema(&client).await.unwrap();
        assert_eq!(snapshot.schema.table_names(), vec!["users"]);
    }
}
