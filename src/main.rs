// dsl-exporter - Console DSL bulk exporter
// Copyright (c) 2025 dsl-exporter Contributors
// Licensed under the MIT License

use clap::Parser;
use dsl_exporter::cli::commands::EXIT_FATAL;
use dsl_exporter::cli::{Cli, Commands};
use dsl_exporter::config::load_config_or_default;
use dsl_exporter::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config_path = cli.config_path();

    // Commands report configuration errors themselves; logging falls back to defaults
    let config = load_config_or_default(config_path.as_deref()).ok();
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| config.as_ref().map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let logging_config = config.map(|c| c.logging).unwrap_or_default();

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_FATAL);
        }
    };

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "dsl-exporter");

    let exit_code = match execute_command(&cli, config_path.as_deref()).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL
        }
    };

    // process::exit skips destructors
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, config_path: Option<&str>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Export(args) => args.execute(config_path).await,
        Commands::Restore(args) => args.execute(config_path).await,
        Commands::ValidateConfig(args) => args.execute(config_path).await,
        Commands::Init(args) => args.execute().await,
    }
}
