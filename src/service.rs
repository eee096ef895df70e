//! Request orchestration.
//!
//! `QueryService` owns the LLM client and drives one natural-language
//! request end to end: gather sample data, build the prompt, generate
//! statements, run the batch, assemble the payload.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::db::{DatabaseClient, SchemaSnapshot};
use crate::error::Result;
use crate::llm::{self, prompt, LlmClient};
use crate::permissions::{PermissionSet, RunMode};
use crate::pipeline::{self, BatchResponse};

/// Rows of sample data included per table in the prompt.
const SAMPLE_ROWS_PER_TABLE: u32 = 3;

/// A natural-language request with its execution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    /// The natural-language request.
    pub query: String,

    /// Run mode; defaults to read-only.
    #[serde(default)]
    pub mode: RunMode,

    #[serde(default)]
    pub allow_insert: bool,

    #[serde(default)]
    pub allow_update: bool,

    #[serde(default)]
    pub allow_delete: bool,
}

impl QueryRequest {
    /// Builds a read-only request for the given text.
    pub fn read_only(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            mode: RunMode::ReadOnly,
            allow_insert: false,
            allow_update: false,
            allow_delete: false,
        }
    }

    fn permissions(&self) -> PermissionSet {
        PermissionSet {
            allow_insert: self.allow_insert,
            allow_update: self.allow_update,
            allow_delete: self.allow_delete,
        }
    }
}

/// Drives natural-language requests through generation and execution.
pub struct QueryService {
    llm: Box<dyn LlmClient>,
}

impl QueryService {
    /// Creates a service with the given LLM client.
    pub fn new(llm: Box<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Handles one request end to end.
    ///
    /// Per-statement failures are reported inside the returned payload.
    /// Only infrastructure failures (model unreachable, prompt assembly)
    /// surface as `Err`.
    pub async fn handle(
        &self,
        db: &dyn DatabaseClient,
        snapshot: &SchemaSnapshot,
        request: &QueryRequest,
    ) -> Result<BatchResponse> {
        info!("Processing request in {} mode", request.mode.as_str());

        let samples = self.collect_samples(db, snapshot).await;
        let samples_text = prompt::format_samples(&samples);

        let request_section = prompt::build_request_section(&request.query, &samples_text);
        let full_prompt =
            prompt::build_full_prompt(&snapshot.schema.format_for_prompt(), &request_section);

        let generated = llm::generate_queries(self.llm.as_ref(), full_prompt).await?;
        debug!("Model produced {} statement(s)", generated.queries.len());

        let (results, mutated_tables) = pipeline::run_batch(
            &generated.queries,
            request.mode,
            &request.permissions(),
            db,
        )
        .await;

        let mut response = pipeline::assemble(results, mutated_tables, db).await;
        response.raw_gemini_response = generated.raw_response;
        response.full_prompt = generated.full_prompt;

        Ok(response)
    }

    /// Fetches sample rows from every table in the snapshot.
    ///
    /// A table that fails to read is skipped; sample data is best-effort
    /// prompt context, never a reason to fail the request.
    async fn collect_samples(
        &self,
        db: &dyn DatabaseClient,
        snapshot: &SchemaSnapshot,
    ) -> Vec<(String, Vec<serde_json::Map<String, serde_json::Value>>)> {
        let mut samples = Vec::new();
        for table in snapshot.schema.table_names() {
            match db.sample_rows(table, SAMPLE_ROWS_PER_TABLE).await {
                Ok(result) => samples.push((table.to_string(), result.rows_as_maps())),
                Err(e) => {
                    warn!("Failed to sample rows from '{}': {}", table, e);
                }
            }
        }
        samples
    }
}
