//! Parsing of model output into SQL statements.
//!
//! Models do not reliably honor the response-format instructions, so
//! parsing degrades through a chain of fallbacks instead of failing:
//! JSON object with a "queries" array, then a numbered list, then the
//! whole cleaned text as a single statement.

use std::sync::OnceLock;

use regex::Regex;

fn json_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"))
}

fn numbered_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\d+\.\s+").expect("valid regex"))
}

/// Parses model output into a list of candidate SQL statements.
///
/// Never returns an empty list for non-empty input; the last fallback is
/// the cleaned text itself. Order is preserved throughout.
pub fn parse_query_list(text: &str) -> Vec<String> {
    // First choice: a JSON object with a "queries" string array.
    if let Some(json_match) = json_block_re().find(text) {
        if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(json_match.as_str()) {
            if let Some(queries) = parsed.get("queries").and_then(|q| q.as_array()) {
                return queries
                    .iter()
                    .filter_map(|q| q.as_str())
                    .map(|q| q.to_string())
                    .collect();
            }
            // Parseable JSON without the expected shape falls back to
            // treating the whole output as one statement.
            return vec![strip_fences(text)];
        }
    }

    let cleaned = strip_fences(text);

    // Second choice: a numbered list ("1. SELECT ...").
    let items = split_numbered_list(&cleaned);
    if !items.is_empty() {
        return items;
    }

    vec![cleaned]
}

/// Removes markdown code fences from the model output.
fn strip_fences(text: &str) -> String {
    text.trim()
        .replace("```sql", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Splits "1. ...\n2. ..." into items, each running until the next marker.
fn split_numbered_list(text: &str) -> Vec<String> {
    let markers: Vec<_> = numbered_item_re().find_iter(text).collect();
    if markers.is_empty() {
        return Vec::new();
    }

    let mut items = Vec::with_capacity(markers.len());
    for (i, marker) in markers.iter().enumerate() {
        let start = marker.end();
        let end = markers
            .get(i + 1)
            .map(|next| next.start())
            .unwrap_or(text.len());
        let item = text[start..end].trim();
        if !item.is_empty() {
            items.push(item.to_string());
        }
    }
    items
}
