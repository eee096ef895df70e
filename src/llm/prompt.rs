//! Prompt construction for SQL generation.
//!
//! The prompt has two layers: an inner request section carrying the user's
//! words and sample data, and an outer wrapper carrying the schema and the
//! response-format contract.

/// Formats per-table sample rows for inclusion in the request section.
///
/// Tables with no rows are skipped entirely.
pub fn format_samples(
    samples: &[(String, Vec<serde_json::Map<String, serde_json::Value>>)],
) -> String {
    let mut text = String::new();
    for (table, records) in samples {
        if records.is_empty() {
            continue;
        }
        text.push_str(&format!("\nSample data from {table} table:\n"));
        for (index, record) in records.iter().enumerate() {
            let json = serde_json::to_string(&serde_json::Value::Object(record.clone()))
                .unwrap_or_else(|_| "{}".to_string());
            text.push_str(&format!("- Record {}: {}\n", index + 1, json));
        }
    }
    text
}

/// Builds the inner request section from the user's request and sample data.
pub fn build_request_section(request: &str, samples_text: &str) -> String {
    format!(
        r#"Process the following request into one or more SQL queries.
If the request involves multiple operations (like creating a table AND inserting data),
return each SQL query as an item in a numbered list.
If it's a single operation, just return the SQL query.

Sample data from the database to help you understand the existing data format:
{samples_text}

Request: "{request}"
"#
    )
}

/// Wraps the request section with the schema and the response-format
/// contract. This is the exact text sent to the model and echoed back in
/// the response payload.
pub fn build_full_prompt(schema_json: &str, request_section: &str) -> String {
    format!(
        r#"You are an AI assistant that converts natural language requests into SQL queries.
Given the following database schema:
{schema_json}

{request_section}

IMPORTANT: Return your response as a valid JSON object with the following structure:
{{
  "queries": [
    "SQL query 1;",
    "SQL query 2;",
    ...
  ]
}}

Guidelines:
1. Each query in the array must be a complete, valid SQL statement ending with a semicolon.
2. Each query must be executable independently in MySQL.
3. Do not include newlines or special formatting within the queries.
4. Do not include code blocks or markdown, just the JSON object.
5. Each query should be a string with proper escaping.
6. If only one operation is needed, the queries array will have just one element.
7. If the table is already present in the schema then do not create new table, give sql query considering the old table fields only.
8. Do not modify the table fields if already present also do not give sql query with 'not exists' or similar clause.
9. For INSERT operations to insert records which are not specified in the request, insert records like the ones already present in that table. Use realistic values everywhere.
10. While creating table if id field is present in it and not a foreign key then set it to auto increment by default.
"#
    )
}
