//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for dsl-exporter using clap.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::Path;

/// Configuration file picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "dsl-exporter.toml";

/// dsl-exporter - bulk export of console application DSL documents
#[derive(Parser, Debug)]
#[command(name = "dsl-exporter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "DSL_EXPORTER_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "DSL_EXPORTER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Explicit `--config` path, else `dsl-exporter.toml` when it exists
    pub fn config_path(&self) -> Option<String> {
        self.config.clone().or_else(|| {
            Path::new(DEFAULT_CONFIG_FILE)
                .exists()
                .then(|| DEFAULT_CONFIG_FILE.to_string())
        })
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export every application's DSL to the output directory
    Export(commands::export::ExportArgs),

    /// Bind the placeholders of a normalized document to another environment's datasets
    Restore(commands::restore::RestoreArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from(["dsl-exporter", "export"]);
        assert!(matches!(cli.command, Commands::Export(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["dsl-exporter", "--config", "custom.toml", "export"]);
        assert_eq!(cli.config, Some("custom.toml".to_string()));
        assert_eq!(cli.config_path(), Some("custom.toml".to_string()));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["dsl-exporter", "--log-level", "debug", "export"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_export_flags() {
        let cli = Cli::parse_from([
            "dsl-exporter",
            "export",
            "--base-url",
            "https://dify.example.com",
            "--output-dir",
            "out",
            "--mode",
            "workflow,advanced-chat",
            "--app-id",
            "a1",
            "--app-id",
            "a2",
            "--include-secret",
            "--headless",
        ]);

        let Commands::Export(args) = cli.command else {
            panic!("expected export command");
        };
        assert_eq!(args.base_url.as_deref(), Some("https://dify.example.com"));
        assert_eq!(args.output_dir.as_deref(), Some("out"));
        assert_eq!(args.mode, vec!["workflow", "advanced-chat"]);
        assert_eq!(args.app_id, vec!["a1", "a2"]);
        assert!(args.include_secret);
        assert!(args.headless);
    }

    #[test]
    fn test_cli_parse_restore() {
        let cli = Cli::parse_from(["dsl-exporter", "restore", "faq-bot.normalized.yml"]);
        let Commands::Restore(args) = cli.command else {
            panic!("expected restore command");
        };
        assert_eq!(args.input.to_str(), Some("faq-bot.normalized.yml"));
        assert!(args.output.is_none());
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["dsl-exporter", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["dsl-exporter", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
