// Compass student career advisor
// Main entry point for the compass binary

use anyhow::Context;
use clap::Parser;
use compass_engine::cli::{Cli, Command, UsersAction};
use compass_engine::config::Config;
use compass_engine::handlers::{
    handle_advise, handle_init, handle_serve, handle_users_count, AdviseArgs, OutputFormat,
};
use compass_engine::telemetry::init_telemetry_with_level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // A missing .env file is fine
    dotenvy::dotenv().ok();

    // Determine output format
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    // `init` must work before any configuration exists
    if let Command::Init = cli.command {
        init_telemetry_with_level(cli.log.as_deref().unwrap_or("info"));
        let path = match &cli.config {
            Some(path) => path.clone(),
            None => Config::default_config_path()?,
        };
        return handle_init(&path, format).await;
    }

    // Load configuration (or use custom path if provided)
    let config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?
    } else {
        Config::load_or_create().context("Failed to load configuration")?
    };

    // --log wins over the config file; RUST_LOG wins over both
    init_telemetry_with_level(cli.log.as_deref().unwrap_or(&config.server.log_level));

    tracing::info!(
        "Compass v{} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_COMMIT_HASH")
    );

    // Handle commands
    match cli.command {
        Command::Serve { port } => {
            tracing::info!("Starting web server...");
            handle_serve(&config, port).await
        }

        Command::Init => Ok(()),

        Command::Advise {
            name,
            grade,
            interests,
            goals,
            prompt,
        } => {
            let args = AdviseArgs {
                name,
                grade,
                interests,
                goals,
                prompt,
            };
            handle_advise(args, &config, format).await
        }

        Command::Users { action } => match action {
            UsersAction::Count => handle_users_count(&config, format).await,
        },
    }
}
