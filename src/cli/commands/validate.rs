//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the dsl-exporter configuration file.

use super::{EXIT_CONFIG, EXIT_SUCCESS};
use crate::config::{load_config_or_default, redact, ExporterConfig};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        let source = config_path.unwrap_or("<defaults and environment>");
        tracing::info!(config_path = %source, "Validating configuration");

        println!("🔍 Validating configuration: {source}");
        println!();

        // Loading runs validation as well
        let config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        for line in summary_lines(&config) {
            println!("{line}");
        }
        println!();

        if let Err(e) = config.console.require_base_url() {
            println!("⚠️  {e}");
        }

        Ok(EXIT_SUCCESS)
    }
}

/// Human-readable summary with secrets masked
fn summary_lines(config: &ExporterConfig) -> Vec<String> {
    let none = || "(not set)".to_string();

    vec![
        "Configuration Summary:".to_string(),
        format!("  Log Level: {}", config.application.log_level),
        format!(
            "  Console URL: {}",
            if config.console.base_url.is_empty() {
                none()
            } else {
                config.console.base_url.clone()
            }
        ),
        format!(
            "  Console Email: {}",
            config.console.email.clone().unwrap_or_else(none)
        ),
        format!(
            "  Console Password: {}",
            config.console.password.as_ref().map(redact).unwrap_or_else(none)
        ),
        format!(
            "  Access Token: {}",
            config
                .console
                .access_token
                .as_ref()
                .map(redact)
                .unwrap_or_else(none)
        ),
        format!("  Headless: {}", config.console.headless),
        format!("  Timeout: {}s", config.console.timeout_seconds),
        format!("  TLS Verify: {}", config.console.tls_verify),
        format!("  Output Directory: {}", config.export.output_dir),
        format!("  Include Secret: {}", config.export.include_secret),
        format!(
            "  Modes: {}",
            if config.export.modes.is_empty() {
                "all".to_string()
            } else {
                config.export.modes.join(", ")
            }
        ),
        format!(
            "  App IDs: {}",
            if config.export.app_ids.is_empty() {
                "all".to_string()
            } else {
                config.export.app_ids.join(", ")
            }
        ),
        format!(
            "  Name Pattern: {}",
            config.export.name_pattern.clone().unwrap_or_else(none)
        ),
        format!(
            "  Knowledge API: {}",
            config.knowledge.api_url.clone().unwrap_or_else(none)
        ),
        format!(
            "  Knowledge API Key: {}",
            config
                .knowledge
                .api_key
                .as_ref()
                .map(redact)
                .unwrap_or_else(none)
        ),
        format!(
            "  Dataset Placeholders: {}",
            if config.knowledge.is_complete() {
                "enabled"
            } else {
                "disabled"
            }
        ),
        format!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                format!(
                    "{} ({})",
                    config.logging.local_path, config.logging.local_rotation
                )
            } else {
                "disabled".to_string()
            }
        ),
    ]
}
