//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG, EXIT_FATAL, EXIT_SUCCESS};
use crate::cli::DEFAULT_CONFIG_FILE;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing dsl-exporter configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set console.base_url in {}", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - DSL_EXPORTER_CONSOLE_EMAIL and DSL_EXPORTER_CONSOLE_PASSWORD");
                println!("     - DSL_EXPORTER_KNOWLEDGE_API_KEY (for dataset placeholders)");
                println!("  3. Validate configuration: dsl-exporter validate-config");
                println!("  4. Run export: dsl-exporter export");
                println!();
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# dsl-exporter configuration

[application]
log_level = "info"

[console]
base_url = "https://dify.example.com"
# email = "you@example.com"
timeout_seconds = 60
tls_verify = true
headless = false

[export]
output_dir = "./dsl"
include_secret = false
modes = []
app_ids = []

[knowledge]
# api_url = "https://dify.example.com/v1"
# api_key = "${DSL_EXPORTER_KNOWLEDGE_API_KEY}"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# dsl-exporter configuration
#
# Every value can be overridden with DSL_EXPORTER_<SECTION>_<KEY>
# environment variables, and "${VAR}" references are substituted
# from the environment (or a .env file) when the file is loaded.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Console
# ============================================================================
[console]
# Base URL of the console (no trailing /console/api)
base_url = "https://dify.example.com"

# Login credentials. Without a password you are prompted on the terminal
# unless headless is set.
# email = "you@example.com"
# password = "${DSL_EXPORTER_PASSWORD}"

# Pre-issued console access token, used instead of logging in
# access_token = "${DSL_EXPORTER_ACCESS_TOKEN}"

# Never prompt for credentials (CI and cron jobs)
headless = false

# Request timeout in seconds
timeout_seconds = 60

# TLS certificate verification
tls_verify = true

# ============================================================================
# Export
# ============================================================================
[export]
# Directory receiving <app>.yml and <app>.normalized.yml
output_dir = "./dsl"

# Include secret environment variables in the exported DSL
include_secret = false

# Only export these modes: chat, completion, agent-chat, advanced-chat, workflow
modes = []

# Only export these application IDs (empty = all)
app_ids = []

# Only export applications whose name matches this regex
# name_pattern = "^prod-"

# Write a JSON run report
# report_path = "./dsl/export-report.json"

# ============================================================================
# Knowledge API (dataset placeholders)
# ============================================================================
# With both values set, every exported document also gets a normalized twin
# whose dataset IDs are replaced by {{#dataset.<name>#}} placeholders.
[knowledge]
# api_url = "https://dify.example.com/v1"
# api_key = "${DSL_EXPORTER_KNOWLEDGE_API_KEY}"

# ============================================================================
# Logging
# ============================================================================
[logging]
# JSON log files in addition to console output
local_enabled = false

# Log directory
local_path = "./logs"

# Rotation: daily, hourly or never
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExporterConfig;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: DEFAULT_CONFIG_FILE.to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.output, "dsl-exporter.toml");
        assert!(!args.with_examples);
        assert!(!args.force);
    }

    #[test]
    fn test_generate_minimal_config() {
        let content = InitArgs::generate_minimal_config();
        let config: ExporterConfig = toml::from_str(&content).unwrap();

        assert_eq!(config.console.base_url, "https://dify.example.com");
        assert_eq!(config.export.output_dir, "./dsl");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generate_config_with_examples() {
        let content = InitArgs::generate_config_with_examples();
        let config: ExporterConfig = toml::from_str(&content).unwrap();

        assert!(content.contains("[knowledge]"));
        assert!(!config.knowledge.is_complete());
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dsl-exporter.toml");
        fs::write(&path, "# existing").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().into_owned(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.execute().await.unwrap(), EXIT_CONFIG);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# existing");
    }
}
