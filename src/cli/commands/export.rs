//! Export command implementation
//!
//! This module implements the `export` command, which writes every
//! application's DSL document (and its normalized twin) to a directory.

use super::{exit_code_for, EXIT_CONFIG, EXIT_FATAL, EXIT_PARTIAL, EXIT_SUCCESS};
use crate::adapters::console::Credentials;
use crate::config::{load_config_or_default, secret_string, ExporterConfig};
use crate::core::export::{
    AppFilterBuilder, ExportBackends, ExportCoordinator, ExportOptions, ExportRun,
    NormalizationMode,
};
use crate::domain::Result;
use clap::Args;

/// Maximum number of failures listed in the summary
const MAX_LISTED_FAILURES: usize = 20;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Console base URL (e.g. https://dify.example.com)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Directory the documents are written to
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Console login email
    #[arg(long)]
    pub email: Option<String>,

    /// Include secret environment variables in the exported DSL
    #[arg(long)]
    pub include_secret: bool,

    /// Only export applications of these modes (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub mode: Vec<String>,

    /// Only export these application IDs (repeatable or comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub app_id: Vec<String>,

    /// Only export applications whose name matches this regex
    #[arg(long)]
    pub name_pattern: Option<String>,

    /// Knowledge API base URL used to load datasets for placeholders
    #[arg(long)]
    pub knowledge_api_url: Option<String>,

    /// Knowledge API key used to load datasets for placeholders
    #[arg(long)]
    pub knowledge_api_key: Option<String>,

    /// Never prompt for credentials
    #[arg(long)]
    pub headless: bool,

    /// Write a JSON run report to this path
    #[arg(long)]
    pub report: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config
            .validate()
            .and_then(|_| config.console.require_base_url())
        {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG);
        }

        let options = match build_options(&config) {
            Ok(o) => o,
            Err(e) => {
                tracing::error!(error = %e, "Invalid export options");
                eprintln!("Invalid export options: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let backends = ExportBackends::http(
            config.console.timeout_seconds,
            config.console.tls_verify,
            config.console.access_token.clone(),
        );

        println!("🚀 Exporting applications from {}", options.base_url);
        println!();

        let run = match ExportCoordinator::new(options, backends)
            .execute_export()
            .await
        {
            Ok(run) => run,
            Err(e) => {
                crate::log_error_with_context!(&e, "Export run aborted");
                eprintln!("Export failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        print_summary(&run);

        if let Some(ref report_path) = config.export.report_path {
            match run.write_report(report_path).await {
                Ok(()) => println!("📝 Report written to {report_path}"),
                Err(e) => {
                    tracing::error!(error = %e, path = %report_path, "Failed to write report");
                    eprintln!("Failed to write report {report_path}: {e}");
                    return Ok(EXIT_FATAL);
                }
            }
        }

        let exit_code = if run.is_successful() {
            println!("✅ Export completed successfully!");
            EXIT_SUCCESS
        } else {
            println!("⚠️  Export completed with failures");
            EXIT_PARTIAL
        };

        Ok(exit_code)
    }

    /// Apply command-line flags on top of the loaded configuration
    fn apply_overrides(&self, config: &mut ExporterConfig) {
        if let Some(ref base_url) = self.base_url {
            config.console.base_url = base_url.clone();
        }
        if let Some(ref output_dir) = self.output_dir {
            config.export.output_dir = output_dir.clone();
        }
        if let Some(ref email) = self.email {
            config.console.email = Some(email.clone());
        }
        if self.include_secret {
            config.export.include_secret = true;
        }
        if self.headless {
            config.console.headless = true;
        }
        if !self.mode.is_empty() {
            tracing::info!(modes = ?self.mode, "Overriding modes from CLI");
            config.export.modes = self.mode.clone();
        }
        if !self.app_id.is_empty() {
            tracing::info!(app_ids = ?self.app_id, "Overriding app IDs from CLI");
            config.export.app_ids = self.app_id.clone();
        }
        if let Some(ref pattern) = self.name_pattern {
            config.export.name_pattern = Some(pattern.clone());
        }
        if let Some(ref url) = self.knowledge_api_url {
            config.knowledge.api_url = Some(url.clone());
        }
        if let Some(ref key) = self.knowledge_api_key {
            config.knowledge.api_key = Some(secret_string(key.clone()));
        }
        if let Some(ref report) = self.report {
            config.export.report_path = Some(report.clone());
        }
    }
}

/// Build the run options from a validated configuration
pub fn build_options(config: &ExporterConfig) -> Result<ExportOptions> {
    let filter = AppFilterBuilder::new()
        .modes(&config.export.modes)?
        .app_ids(&config.export.app_ids)
        .name_pattern(config.export.name_pattern.as_deref())?
        .build();

    let credentials = config.console.email.as_ref().map(|email| Credentials {
        email: email.clone(),
        password: config.console.password.clone(),
    });

    let normalization = NormalizationMode::from_parts(
        config.knowledge.api_url.clone(),
        config.knowledge.api_key.clone(),
    );

    Ok(
        ExportOptions::new(&config.console.base_url, &config.export.output_dir)
            .with_credentials(credentials)
            .with_include_secret(config.export.include_secret)
            .with_headless(config.console.headless)
            .with_filter(filter)
            .with_normalization(normalization),
    )
}

fn print_summary(run: &ExportRun) {
    println!();
    println!("📊 Export Summary:");
    println!("  Output Directory: {}", run.output_dir.display());
    println!("  Total Applications: {}", run.total());
    println!("  Successful: {}", run.success_count());
    println!("  Failed: {}", run.failure_count());
    println!(
        "  Normalized Documents: {}",
        if run.normalization_enabled {
            "yes"
        } else {
            "no"
        }
    );
    println!("  Duration: {:.2}s", run.duration.as_secs_f64());
    println!("  Success Rate: {:.2}%", run.success_rate());
    println!();

    if run.failure_count() > 0 {
        println!("⚠️  Failed applications:");
        for failure in run.failures().take(MAX_LISTED_FAILURES) {
            println!("  - {} ({})", failure.app_name, failure.app_id);
            if let Some(ref error) = failure.error {
                println!("    Reason: {error}");
            }
        }
        if run.failure_count() > MAX_LISTED_FAILURES {
            println!(
                "  ... and {} more failures",
                run.failure_count() - MAX_LISTED_FAILURES
            );
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_args_defaults() {
        let args = ExportArgs::default();

        assert!(args.base_url.is_none());
        assert!(!args.include_secret);
        assert!(args.mode.is_empty());
        assert!(args.report.is_none());
    }

    #[test]
    fn test_apply_overrides() {
        let args = ExportArgs {
            base_url: Some("https://dify.example.com".to_string()),
            output_dir: Some("out".to_string()),
            include_secret: true,
            mode: vec!["workflow".to_string()],
            knowledge_api_url: Some("https://dify.example.com/v1".to_string()),
            knowledge_api_key: Some("dataset-abcdef123456".to_string()),
            report: Some("report.json".to_string()),
            ..Default::default()
        };

        let mut config = ExporterConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.console.base_url, "https://dify.example.com");
        assert_eq!(config.export.output_dir, "out");
        assert!(config.export.include_secret);
        assert_eq!(config.export.modes, vec!["workflow"]);
        assert!(config.knowledge.is_complete());
        assert_eq!(config.export.report_path.as_deref(), Some("report.json"));
    }

    #[test]
    fn test_build_options() {
        let mut config = ExporterConfig::default();
        config.console.base_url = "https://dify.example.com".to_string();
        config.console.email = Some("ops@example.com".to_string());
        config.console.password = Some(secret_string("hunter22".to_string()));
        config.export.modes = vec!["chat".to_string()];

        let options = build_options(&config).unwrap();

        assert_eq!(options.base_url, "https://dify.example.com");
        assert!(options.credentials.is_some());
        assert!(options.filter.is_some());
        assert!(!options.normalization.is_enabled());
    }

    #[test]
    fn test_build_options_without_password_keeps_email() {
        let mut config = ExporterConfig::default();
        config.console.base_url = "https://dify.example.com".to_string();
        config.console.email = Some("ops@example.com".to_string());

        let options = build_options(&config).unwrap();

        let credentials = options.credentials.unwrap();
        assert_eq!(credentials.email, "ops@example.com");
        assert!(credentials.password.is_none());
        assert!(options.filter.is_none());
    }

    #[test]
    fn test_build_options_without_email_prompts_for_both() {
        let mut config = ExporterConfig::default();
        config.console.base_url = "https://dify.example.com".to_string();

        let options = build_options(&config).unwrap();

        assert!(options.credentials.is_none());
    }

    #[test]
    fn test_build_options_rejects_unknown_mode() {
        let mut config = ExporterConfig::default();
        config.export.modes = vec!["spreadsheet".to_string()];

        assert!(build_options(&config).is_err());
    }
}
