//! Command handlers for CLI operations
//!
//! This module implements the handlers for all CLI commands:
//! - serve: Run the web server until Ctrl-C
//! - init: Write the default configuration file
//! - advise: Ask the advisor once from the terminal
//! - users count: Print the number of registered users

use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;

use crate::advisor::AdvisorResolver;
use crate::config::Config;
use crate::db::Database;
use sdk::types::{AdvisorRequest, UserProfile};

/// Output format for command results
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine consumption
    Json,
}

/// Profile fields supplied on the command line for `advise`
#[derive(Debug, Clone, Default)]
pub struct AdviseArgs {
    pub name: String,
    pub grade: Option<String>,
    pub interests: Vec<String>,
    pub goals: Option<String>,
    pub prompt: Option<String>,
}

impl AdviseArgs {
    /// Ephemeral profile that is never stored
    fn profile(&self) -> UserProfile {
        UserProfile {
            id: "cli".to_string(),
            name: self.name.trim().to_string(),
            email: String::new(),
            password_hash: String::new(),
            grade: self.grade.clone(),
            interests: self
                .interests
                .iter()
                .map(|i| i.trim().to_string())
                .filter(|i| !i.is_empty())
                .collect(),
            goals: self.goals.clone(),
            created_at: 0,
        }
    }
}

/// Open the configured database
pub async fn open_database(config: &Config) -> Result<Database> {
    Database::connect(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to open database")
}

/// Run the web server until Ctrl-C, then close the database
pub async fn handle_serve(config: &Config, port: Option<u16>) -> Result<()> {
    let mut config = config.clone();
    if let Some(port) = port {
        config.server.port = port;
    }

    let database = open_database(&config).await?;
    let result = crate::server::serve(&config, &database, shutdown_signal()).await;

    database.close().await?;
    result
}

/// Write the default configuration file if missing and report its path
pub async fn handle_init(path: &Path, format: OutputFormat) -> Result<()> {
    let created = Config::create_default(path).context("Failed to write default config")?;

    match format {
        OutputFormat::Text => {
            if created {
                println!("✓ Created configuration at {}", path.display());
            } else {
                println!("Configuration already exists at {}", path.display());
            }
        }
        OutputFormat::Json => {
            let output = json!({
                "path": path.display().to_string(),
                "created": created,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Resolve advice once for a profile given on the command line
pub async fn handle_advise(args: AdviseArgs, config: &Config, format: OutputFormat) -> Result<()> {
    if args.name.trim().is_empty() {
        anyhow::bail!("--name must not be empty");
    }

    let resolver = AdvisorResolver::from_config(&config.advisor);
    let request = AdvisorRequest::new(args.profile(), args.prompt.as_deref());
    let advice = resolver.resolve(&request).await;

    match format {
        OutputFormat::Text => {
            println!("{}", advice.text);
        }
        OutputFormat::Json => {
            let output = json!({
                "prompt": request.prompt,
                "source": advice.source,
                "advice": advice.text,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Print the number of registered users
pub async fn handle_users_count(config: &Config, format: OutputFormat) -> Result<()> {
    let database = open_database(config).await?;
    let count = database
        .users()
        .count()
        .await
        .context("Failed to count users")?;
    database.close().await?;

    match format {
        OutputFormat::Text => println!("{} registered user(s)", count),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "users": count }))?);
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl-C, shutting down"),
        Err(e) => tracing::error!("Failed to listen for Ctrl-C: {}", e),
    }
}
