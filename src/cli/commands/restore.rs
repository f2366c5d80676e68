//! Restore command implementation
//!
//! This module implements the `restore` command, which binds the dataset
//! placeholders of a normalized document to the datasets of the environment
//! the knowledge API points at.

use super::{exit_code_for, EXIT_CONFIG, EXIT_SUCCESS};
use crate::adapters::knowledge::{DatasetApiConfig, DatasetConnector, HttpDatasetConnector};
use crate::config::{load_config_or_default, secret_string};
use crate::core::export::writer::NORMALIZED_EXTENSION;
use crate::core::transform::{restore_dataset_ids, PlaceholderTable};
use crate::domain::{ExporterError, Result};
use clap::Args;
use std::path::{Path, PathBuf};

/// Suffix of documents produced by this command
const RESTORED_EXTENSION: &str = "restored.yml";

/// Arguments for the restore command
#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Normalized document to restore
    pub input: PathBuf,

    /// Output path (defaults to `<name>.restored.yml` next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Knowledge API base URL of the target environment
    #[arg(long)]
    pub knowledge_api_url: Option<String>,

    /// Knowledge API key of the target environment
    #[arg(long)]
    pub knowledge_api_key: Option<String>,
}

impl RestoreArgs {
    /// Execute the restore command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input.display(), "Starting restore command");

        let mut config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        if let Some(ref url) = self.knowledge_api_url {
            config.knowledge.api_url = Some(url.clone());
        }
        if let Some(ref key) = self.knowledge_api_key {
            config.knowledge.api_key = Some(secret_string(key.clone()));
        }

        let (Some(api_url), Some(api_key)) = (config.knowledge.api_url, config.knowledge.api_key)
        else {
            eprintln!(
                "Restore needs the knowledge API of the target environment \
                 (--knowledge-api-url and --knowledge-api-key)"
            );
            return Ok(EXIT_CONFIG);
        };

        let api = DatasetApiConfig::new(api_url, api_key);
        let connector =
            HttpDatasetConnector::new(config.console.timeout_seconds, config.console.tls_verify);
        let output = self
            .output
            .clone()
            .unwrap_or_else(|| restored_path(&self.input));

        match restore_file(&connector, &api, &self.input, &output).await {
            Ok(()) => {
                println!("✅ Restored document written to {}", output.display());
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Restore failed");
                eprintln!("Restore failed: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }
}

/// Restore `input` against the datasets visible through `api` and write `output`
pub async fn restore_file(
    connector: &dyn DatasetConnector,
    api: &DatasetApiConfig,
    input: &Path,
    output: &Path,
) -> Result<()> {
    let document = tokio::fs::read_to_string(input).await.map_err(|e| {
        ExporterError::Io(format!("Failed to read {}: {}", input.display(), e))
    })?;

    let datasets = connector.connect(api)?.list_datasets().await?;
    let table = PlaceholderTable::from_datasets(&datasets);
    tracing::info!(count = table.len(), "Loaded target datasets");

    let restored = restore_dataset_ids(&document, &table);

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(output, restored).await.map_err(|e| {
        ExporterError::Io(format!("Failed to write {}: {}", output.display(), e))
    })?;

    Ok(())
}

/// `faq-bot.normalized.yml` -> `faq-bot.restored.yml`
fn restored_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let stem = name
        .strip_suffix(&format!(".{NORMALIZED_EXTENSION}"))
        .or_else(|| name.strip_suffix(".yml"))
        .or_else(|| name.strip_suffix(".yaml"))
        .unwrap_or(&name);

    input.with_file_name(format!("{stem}.{RESTORED_EXTENSION}"))
}
