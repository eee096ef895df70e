//! Mock LLM client for testing.
//!
//! Provides deterministic responses based on input patterns.

use async_trait::async_trait;

use crate::error::Result;
use crate::llm::LlmClient;

/// Mock LLM client that returns canned responses based on input patterns.
///
/// Used for unit testing without making real API calls.
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    /// Custom response mappings (pattern -> response).
    custom_responses: Vec<(String, String)>,
}

impl MockLlmClient {
    /// Creates a new mock client with default responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom response mapping.
    ///
    /// When the prompt contains `pattern`, the mock will return `response`.
    pub fn with_response(
        mut self,
        pattern: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.custom_responses
            .push((pattern.into(), response.into()));
        self
    }

    /// Generates a mock response based on the prompt.
    fn mock_response(&self, prompt: &str) -> String {
        let prompt_lower = prompt.to_lowercase();

        // Check custom responses first
        for (pattern, response) in &self.custom_responses {
            if prompt_lower.contains(&pattern.to_lowercase()) {
                return response.clone();
            }
        }

        // Default pattern matching
        if prompt_lower.contains("all users") || prompt_lower.contains("show users") {
            return r#"{"queries": ["SELECT * FROM users;"]}"#.to_string();
        }

        if prompt_lower.contains("count") && prompt_lower.contains("orders") {
            return r#"{"queries": ["SELECT COUNT(*) FROM orders;"]}"#.to_string();
        }

        if (prompt_lower.contains("insert") || prompt_lower.contains("add"))
            && prompt_lower.contains("user")
        {
            return r#"{"queries": ["INSERT INTO users (email, name) VALUES ('test@example.com', 'Test User');"]}"#.to_string();
        }

        if prompt_lower.contains("delete") && prompt_lower.contains("user") {
            return r#"{"queries": ["DELETE FROM users WHERE id = 1;"]}"#.to_string();
        }

        r#"{"queries": ["SELECT * FROM users;"]}"#.to_string()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        Ok(self.mock_response(prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_select_all_users() {
        let client = MockLlmClient::new();
        let response = client.complete("Show me all users").await.unwrap();
        assert!(response.contains("SELECT * FROM users"));
    }

    #[tokio::test]
    async fn test_mock_returns_count_orders() {
        let client = MockLlmClient::new();
        let response = client.complete("Count all orders").await.unwrap();
        assert!(response.contains("SELECT COUNT(*) FROM orders"));
    }

    #[tokio::test]
    async fn test_mock_custom_response() {
        let client = MockLlmClient::new()
            .with_response("custom query", r#"{"queries": ["SELECT custom FROM t;"]}"#);

        let response = client.complete("Run the custom query").await.unwrap();
        assert!(response.contains("SELECT custom FROM t"));
    }

    #[tokio::test]
    async fn test_mock_case_insensitive() {
        let client = MockLlmClient::new();
        let response = client.complete("SHOW ME ALL USERS").await.unwrap();
        assert!(response.contains("SELECT * FROM users"));
    }

    #[tokio::test]
    async fn test_mock_insert_user() {
        let client = MockLlmClient::new();
        let response = client.complete("Add a new user").await.unwrap();
        assert!(response.contains("INSERT INTO users"));
    }
}
