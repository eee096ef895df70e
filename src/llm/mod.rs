//! LLM integration for natural-language to SQL generation.
//!
//! Defines the `LlmClient` trait, the Gemini implementation, prompt
//! construction, and the tolerant parser that turns model output into a
//! list of candidate SQL statements.

mod gemini;
mod mock;
mod parser;
pub mod prompt;

pub use gemini::{GeminiClient, GeminiConfig};
pub use mock::MockLlmClient;
pub use parser::parse_query_list;

use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

use crate::config::LlmConfig;
use crate::error::{RelayError, Result};

/// Trait for LLM clients.
///
/// One prompt in, one text completion out. Statement parsing and retry
/// policy live elsewhere.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends a prompt and returns the model's text response.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Available LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Gemini,
    Mock,
}

impl FromStr for LlmProvider {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "mock" => Ok(Self::Mock),
            _ => Err(RelayError::config(format!(
                "Unknown LLM provider '{s}'. Expected 'gemini' or 'mock'"
            ))),
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

/// Creates an LLM client from configuration.
pub fn create_client(config: &LlmConfig) -> Result<Box<dyn LlmClient>> {
    let provider = LlmProvider::from_str(&config.provider)?;
    match provider {
        LlmProvider::Gemini => {
            let client = GeminiClient::from_env_with_model(&config.model)?;
            Ok(Box::new(client))
        }
        LlmProvider::Mock => Ok(Box::new(MockLlmClient::new())),
    }
}

/// Statements generated for one request, plus the debugging context the
/// response payload carries through.
#[derive(Debug, Clone)]
pub struct GeneratedQueries {
    /// Candidate SQL statements, in model order.
    pub queries: Vec<String>,

    /// The unmodified model output.
    pub raw_response: String,

    /// The exact prompt that was sent.
    pub full_prompt: String,
}

/// Sends the prompt to the model and parses its output into statements.
pub async fn generate_queries(
    llm: &dyn LlmClient,
    full_prompt: String,
) -> Result<GeneratedQueries> {
    let raw_response = llm.complete(&full_prompt).await?;
    let queries = parse_query_list(&raw_response);

    Ok(GeneratedQueries {
        queries,
        raw_response,
        full_prompt,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!(LlmProvider::from_str("gemini").unwrap(), LlmProvider::Gemini);
        assert_eq!(LlmProvider::from_str("MOCK").unwrap(), LlmProvider::Mock);
        assert!(LlmProvider::from_str("openai").is_err());
    }

    #[test]
    fn test_provider_display() {
        assert_eq!(LlmProvider::Gemini.to_string(), "gemini");
        assert_eq!(LlmProvider::Mock.to_string(), "mock");
    }

    #[test]
    fn test_create_mock_client() {
        let config = LlmConfig {
            provider: "mock".to_string(),
            model: "unused".to_string(),
        };
        assert!(create_client(&config).is_ok());
    }

    #[tokio::test]
    async fn test_generate_queries_parses_and_keeps_context() {
        let client =
            MockLlmClient::new().with_response("orders", r#"{"queries": ["SELECT * FROM orders;"]}"#);

        let generated = generate_queries(&client, "show me the orders".to_string())
            .await
            .unwrap();

        assert_eq!(generated.queries, vec!["SELECT * FROM orders;"]);
        assert!(generated.raw_response.contains("orders"));
        assert_eq!(generated.full_prompt, "show me the orders");
    }
}
