//! Mock database client for testing.
//!
//! `MockDatabaseClient` keeps tables in memory and understands just enough
//! SQL (CREATE TABLE, INSERT, SELECT *, DELETE, UPDATE) to exercise the
//! execution pipeline without a server. `FailingDatabaseClient` errors on
//! every operation.

use crate::db::{Column, ColumnInfo, DatabaseClient, QueryResult, Row, Schema, Table, Value};
use crate::error::{RelayError, Result};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Clone, Default)]
struct MockTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

/// In-memory database client for tests.
#[derive(Debug, Default)]
pub struct MockDatabaseClient {
    // Vec keeps table creation order for schema output.
    tables: Mutex<Vec<(String, MockTable)>>,
    fail_on: Mutex<Vec<String>>,
}

impl MockDatabaseClient {
    /// Creates an empty mock database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes any statement containing `pattern` fail with a query error.
    pub fn fail_matching(&self, pattern: impl Into<String>) {
        self.fail_on.lock().unwrap().push(pattern.into());
    }

    /// Pre-registers a table with columns and rows, bypassing SQL parsing.
    pub fn seed_table(&self, name: &str, columns: &[&str], rows: Vec<Row>) {
        let mut tables = self.tables.lock().unwrap();
        tables.push((
            name.to_string(),
            MockTable {
                columns: columns.iter().map(|c| c.to_string()).collect(),
                rows,
            },
        ));
    }

    fn check_failure(&self, sql: &str) -> Result<()> {
        let patterns = self.fail_on.lock().unwrap();
        for pattern in patterns.iter() {
            if sql.contains(pattern.as_str()) {
                return Err(RelayError::query(format!(
                    "Simulated failure for statement matching '{pattern}'"
                )));
            }
        }
        Ok(())
    }

    fn read_table(&self, name: &str) -> Result<QueryResult> {
        let tables = self.tables.lock().unwrap();
        let table = tables
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t.clone())
            .ok_or_else(|| RelayError::query(format!("Table '{name}' doesn't exist")))?;

        let columns = table
            .columns
            .iter()
            .map(|c| ColumnInfo::new(c.clone(), "varchar"))
            .collect();
        Ok(QueryResult::with_data(columns, table.rows))
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn fetch_schema(&self) -> Result<Schema> {
        let tables = self.tables.lock().unwrap();
        Ok(Schema {
            tables: tables
                .iter()
                .map(|(name, table)| Table {
                    name: name.clone(),
                    columns: table
                        .columns
                        .iter()
                        .map(|c| Column::new(c.clone(), "varchar(255)"))
                        .collect(),
                })
                .collect(),
        })
    }

    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        self.check_failure(sql)?;

        let trimmed = sql.trim().trim_end_matches(';').trim();
        let lowered = trimmed.to_lowercase();

        if lowered.starts_with("create table") {
            let (name, columns) = parse_create_table(trimmed)?;
            let mut tables = self.tables.lock().unwrap();
            if tables.iter().any(|(n, _)| n == &name) {
                return Err(RelayError::query(format!("Table '{name}' already exists")));
            }
            tables.push((
                name,
                MockTable {
                    columns,
                    rows: Vec::new(),
                },
            ));
            return Ok(QueryResult::new());
        }

        if lowered.starts_with("insert") {
            let (name, values) = parse_insert(trimmed)?;
            let mut tables = self.tables.lock().unwrap();
            let table = tables
                .iter_mut()
                .find(|(n, _)| n == &name)
                .map(|(_, t)| t)
                .ok_or_else(|| RelayError::query(format!("Table '{name}' doesn't exist")))?;
            table.rows.push(values);
            return Ok(QueryResult::new());
        }

        if lowered.starts_with("delete from") {
            let name = word_after(trimmed, 2)
                .ok_or_else(|| RelayError::query("Malformed DELETE statement"))?;
            let mut tables = self.tables.lock().unwrap();
            let table = tables
                .iter_mut()
                .find(|(n, _)| n == &name)
                .map(|(_, t)| t)
                .ok_or_else(|| RelayError::query(format!("Table '{name}' doesn't exist")))?;
            table.rows.clear();
            return Ok(QueryResult::new());
        }

        if lowered.starts_with("update") {
            let name = word_after(trimmed, 1)
                .ok_or_else(|| RelayError::query("Malformed UPDATE statement"))?;
            let tables = self.tables.lock().unwrap();
            if !tables.iter().any(|(n, _)| n == &name) {
                return Err(RelayError::query(format!("Table '{name}' doesn't exist")));
            }
            // Row mutation is out of scope for the mock; existence check only.
            return Ok(QueryResult::new());
        }

        if lowered.starts_with("select * from") {
            let name = word_after(trimmed, 3)
                .ok_or_else(|| RelayError::query("Malformed SELECT statement"))?;
            return self.read_table(&name);
        }

        if lowered.starts_with("select") || lowered.starts_with("show") {
            // Arbitrary reads succeed with an empty result set.
            return Ok(QueryResult::new());
        }

        Err(RelayError::query(format!(
            "Mock database does not understand: {trimmed}"
        )))
    }

    async fn select_all(&self, table: &str) -> Result<QueryResult> {
        self.check_failure(table)?;
        self.read_table(table)
    }

    async fn sample_rows(&self, table: &str, limit: u32) -> Result<QueryResult> {
        let mut result = self.read_table(table)?;
        result.rows.truncate(limit as usize);
        Ok(result)
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A database client that fails all operations, for error-path testing.
#[derive(Debug, Default)]
pub struct FailingDatabaseClient;

impl FailingDatabaseClient {
    pub fn new() -> Self {
        Self
    }

    fn fail<T>(&self) -> Result<T> {
        Err(RelayError::query("Simulated database failure"))
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn fetch_schema(&self) -> Result<Schema> {
        self.fail()
    }

    async fn execute_query(&self, _sql: &str) -> Result<QueryResult> {
        self.fail()
    }

    async fn select_all(&self, _table: &str) -> Result<QueryResult> {
        self.fail()
    }

    async fn sample_rows(&self, _table: &str, _limit: u32) -> Result<QueryResult> {
        self.fail()
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Returns the nth whitespace-separated word, unquoted.
fn word_after(sql: &str, n: usize) -> Option<String> {
    sql.split_whitespace()
        .nth(n)
        .map(|w| w.trim_matches(|c| c == '`' || c == '"').to_string())
}

fn parse_create_table(sql: &str) -> Result<(String, Vec<String>)> {
    let name = word_after(sql, 2)
        .map(|w| w.split('(').next().unwrap_or("").to_string())
        .filter(|w| !w.is_empty())
        .ok_or_else(|| RelayError::query("Malformed CREATE TABLE statement"))?;

    let open = sql
        .find('(')
        .ok_or_else(|| RelayError::query("Malformed CREATE TABLE statement"))?;
    let close = sql
        .rfind(')')
        .ok_or_else(|| RelayError::query("Malformed CREATE TABLE statement"))?;

    let columns = sql[open + 1..close]
        .split(',')
        .filter_map(|def| {
            def.split_whitespace()
                .next()
                .map(|w| w.trim_matches('`').to_string())
        })
        .filter(|c| !c.is_empty())
        .collect();

    Ok((name, columns))
}

fn parse_insert(sql: &str) -> Result<(String, Row)> {
    let name = word_after(sql, 2)
        .map(|w| w.split('(').next().unwrap_or("").to_string())
        .filter(|w| !w.is_empty())
        .ok_or_else(|| RelayError::query("Malformed INSERT statement"))?;

    let lowered = sql.to_lowercase();
    let values_pos = lowered
        .find("values")
        .ok_or_else(|| RelayError::query("INSERT statement missing VALUES clause"))?;

    let tail = &sql[values_pos + "values".len()..];
    let open = tail
        .find('(')
        .ok_or_else(|| RelayError::query("Malformed VALUES clause"))?;
    let close = tail
        .rfind(')')
        .ok_or_else(|| RelayError::query("Malformed VALUES clause"))?;

    let values = split_values(&tail[open + 1..close])
        .into_iter()
        .map(|v| parse_literal(&v))
        .collect();

    Ok((name, values))
}

/// Splits a VALUES list on commas that are not inside quotes.
fn split_values(list: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;

    for c in list.chars() {
        match c {
            '\'' => {
                in_quote = !in_quote;
                current.push(c);
            }
            ',' if !in_quote => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

fn parse_literal(raw: &str) -> Value {
    if raw.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    if raw.starts_with('\'') && raw.ends_with('\'') && raw.len() >= 2 {
        return Value::String(raw[1..raw.len() - 1].to_string());
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Value::Float(f);
    }
    Value::String(raw.to_string())
}
