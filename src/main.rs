//! db-relay - natural-language to SQL relay for MySQL databases.
//!
//! Runs one request end to end and prints the JSON response payload on
//! stdout. Logs go to stderr.

use tracing::{error, info};

use db_relay::cli::Cli;
use db_relay::config::{Config, ConnectionConfig, LlmConfig};
use db_relay::db::{self, DatabaseClient, MockDatabaseClient};
use db_relay::error::{RelayError, Result};
use db_relay::llm;
use db_relay::logging;
use db_relay::permissions::RunMode;
use db_relay::service::{QueryRequest, QueryService};

#[tokio::main]
async fn main() {
    // .env is optional; ignore a missing file
    let _ = dotenvy::dotenv();

    logging::init_stderr_logging();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        // Infrastructure failures still produce a machine-readable payload.
        let payload = serde_json::json!({
            "status": "error",
            "message": format!("SERVER ERROR: Failed to process your request: {e}"),
        });
        println!("{payload}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let db: Box<dyn DatabaseClient> = if cli.mock_db {
        info!("Using mock database");
        Box::new(MockDatabaseClient::new())
    } else {
        let connection = resolve_connection(&cli, &config)?.ok_or_else(|| {
            RelayError::config(
                "No database connection configured. Pass --connection-string or set up a config file.",
            )
        })?;
        info!("Connection: {}", connection.display_string());
        db::connect(&connection).await?
    };

    let llm_config = LlmConfig {
        provider: cli.llm.clone().unwrap_or_else(|| config.llm.provider.clone()),
        model: config.llm.model.clone(),
    };
    let llm_client = llm::create_client(&llm_config)?;

    let service = QueryService::new(llm_client);
    let snapshot = db::snapshot_schema(db.as_ref()).await?;

    let request = QueryRequest {
        query: cli.request.clone(),
        mode: if cli.write {
            RunMode::Write
        } else {
            RunMode::ReadOnly
        },
        allow_insert: cli.allow_insert,
        allow_update: cli.allow_update,
        allow_delete: cli.allow_delete,
    };

    let response = service.handle(db.as_ref(), &snapshot, &request).await?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&response)
    } else {
        serde_json::to_string(&response)
    }
    .map_err(|e| RelayError::internal(format!("Failed to serialize response: {e}")))?;

    println!("{output}");

    db.close().await?;
    Ok(())
}

/// Resolves the final connection configuration from CLI args, config file, and environment.
///
/// Precedence: CLI arguments, then the named connection, then the config
/// default, with environment variables filling remaining gaps.
fn resolve_connection(cli: &Cli, config: &Config) -> Result<Option<ConnectionConfig>> {
    // Start with CLI connection config if provided
    let mut connection = cli.to_connection_config()?;

    // If no CLI connection, try named connection from config
    if connection.is_none() {
        if let Some(name) = cli.connection_name() {
            connection = config.get_connection(Some(name)).cloned();
            if connection.is_none() {
                return Err(RelayError::config(format!(
                    "Connection '{}' not found in config file",
                    name
                )));
            }
        }
    }

    // If still no connection, try default from config
    if connection.is_none() {
        connection = config.get_connection(None).cloned();
    }

    // Apply environment variable defaults
    if let Some(ref mut conn) = connection {
        conn.apply_env_defaults();
        return Ok(connection);
    }

    // Last resort: a connection built entirely from DB_* variables
    let mut env_only = ConnectionConfig::default();
    env_only.apply_env_defaults();
    if env_only.database.is_some() {
        return Ok(Some(env_only));
    }

    Ok(None)
}
