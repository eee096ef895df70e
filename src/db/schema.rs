//! Database schema types for db-relay.
//!
//! Represents the structure of a MySQL database as seen through
//! `information_schema`, plus the versioned snapshot threaded through
//! request handling instead of a shared mutable cache.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Represents the complete schema of a database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    /// All tables in the schema.
    pub tables: Vec<Table>,
}

impl Schema {
    /// Creates a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the table names in schema order.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    /// Formats the schema for inclusion in an LLM prompt.
    ///
    /// Produces a pretty-printed JSON object keyed by table name, the same
    /// shape the model is told to expect in the prompt instructions.
    pub fn format_for_prompt(&self) -> String {
        let mut map = serde_json::Map::new();
        for table in &self.tables {
            let columns: Vec<serde_json::Value> = table
                .columns
                .iter()
                .map(|c| {
                    serde_json::json!({
                        "Field": c.name,
                        "Type": c.data_type,
                        "Null": if c.is_nullable { "YES" } else { "NO" },
                        "Key": c.key,
                        "Default": c.default,
                    })
                })
                .collect();
            map.insert(table.name.clone(), serde_json::Value::Array(columns));
        }
        serde_json::to_string_pretty(&serde_json::Value::Object(map))
            .unwrap_or_else(|_| "{}".to_string())
    }
}

/// Represents a database table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    /// Table name.
    pub name: String,

    /// Columns in the table.
    pub columns: Vec<Column>,
}

impl Table {
    /// Creates a new table with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Adds a column, builder style.
    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }
}

/// Represents a column in a table, mirroring MySQL `DESCRIBE` output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Data type (e.g., "int", "varchar(255)").
    pub data_type: String,

    /// Whether the column allows NULL values.
    pub is_nullable: bool,

    /// Key kind ("PRI", "UNI", "MUL", or empty).
    pub key: String,

    /// Default value expression, if any.
    pub default: Option<String>,
}

impl Column {
    /// Creates a new column with the given name and data type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            is_nullable: true,
            key: String::new(),
            default: None,
        }
    }

    /// Sets whether the column is nullable.
    pub fn nullable(self, nullable: bool) -> Self {
        Self {
            is_nullable: nullable,
            ..self
        }
    }

    /// Marks the column as the primary key.
    pub fn primary(self) -> Self {
        Self {
            key: "PRI".to_string(),
            ..self
        }
    }
}

/// A schema together with the instant it was fetched.
///
/// Refreshing produces a new snapshot rather than mutating shared state;
/// callers tolerate a stale snapshot until they explicitly refresh.
#[derive(Debug, Clone)]
pub struct SchemaSnapshot {
    /// The introspected schema.
    pub schema: Schema,

    /// When the schema was read from the database.
    pub fetched_at: SystemTime,
}

impl SchemaSnapshot {
    /// Wraps a schema with the current timestamp.
    pub fn now(schema: Schema) -> Self {
        Self {
            schema,
            fetched_at: SystemTime::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> Schema {
        Schema {
            tables: vec![
                Table::new("users")
                    .with_column(Column::new("id", "int").nullable(false).primary())
                    .with_column(Column::new("email", "varchar(255)").nullable(false))
                    .with_column(Column::new("name", "varchar(100)")),
                Table::new("orders")
                    .with_column(Column::new("id", "int").nullable(false).primary())
                    .with_column(Column::new("user_id", "int").nullable(false)),
            ],
        }
    }

    #[test]
    fn test_table_names() {
        let schema = sample_schema();
        assert_eq!(schema.table_names(), vec!["users", "orders"]);
    }

    #[test]
    fn test_format_for_prompt_is_json_keyed_by_table() {
        let schema = sample_schema();
        let formatted = schema.format_for_prompt();

        let parsed: serde_json::Value = serde_json::from_str(&formatted).unwrap();
        assert!(parsed.get("users").is_some());
        assert!(parsed.get("orders").is_some());

        let users = parsed["users"].as_array().unwrap();
        assert_eq!(users[0]["Field"], "id");
        assert_eq!(users[0]["Key"], "PRI");
        assert_eq!(users[0]["Null"], "NO");
        assert_eq!(users[2]["Null"], "YES");
    }

    #[test]
    fn test_empty_schema_formats_to_empty_object() {
        let schema = Schema::new();
        let parsed: serde_json::Value = serde_json::from_str(&schema.format_for_prompt()).unwrap();
        assert_eq!(parsed, serde_json::json!({}));
    }

    #[test]
    fn test_column_builder() {
        let col = Column::new("email", "varchar(255)").nullable(false);
        assert_eq!(col.name, "email");
        assert_eq!(col.data_type, "varchar(255)");
        assert!(!col.is_nullable);
        assert!(col.key.is_empty());
    }

    #[test]
    fn test_snapshot_carries_timestamp() {
        let before = SystemTime::now();
        let snapshot = SchemaSnapshot::now(sample_schema());
        assert!(snapshot.fetched_at >= before);
        assert_eq!(snapshot.schema.tables.len(), 2);
    }
}
