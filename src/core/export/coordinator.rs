//! Export coordinator - main orchestrator for the export process
//!
//! This module coordinates the export workflow: session acquisition,
//! application listing, dataset table loading, and the per-application
//! export and write loop.

use crate::adapters::console::{
    ConsoleApi, ConsoleConnector, HttpConsoleConnector, PasswordSessionProvider, SessionProvider,
};
use crate::adapters::knowledge::{DatasetConnector, HttpDatasetConnector};
use crate::config::SecretString;
use crate::core::export::options::{ExportOptions, NormalizationMode};
use crate::core::export::summary::{ExportResult, ExportRun};
use crate::core::export::writer::{normalized_filename, raw_filename, DslWriter};
use crate::core::sanitize::FilenameAllocator;
use crate::core::transform::{replace_dataset_ids, PlaceholderTable};
use crate::domain::{Application, Result};
use std::sync::Arc;
use std::time::Instant;

/// Collaborators used by the coordinator
#[derive(Clone)]
pub struct ExportBackends {
    pub sessions: Arc<dyn SessionProvider>,
    pub consoles: Arc<dyn ConsoleConnector>,
    pub datasets: Arc<dyn DatasetConnector>,
}

impl ExportBackends {
    /// HTTP implementations of every collaborator
    pub fn http(
        timeout_seconds: u64,
        tls_verify: bool,
        access_token: Option<SecretString>,
    ) -> Self {
        Self {
            sessions: Arc::new(
                PasswordSessionProvider::new(timeout_seconds, tls_verify)
                    .with_access_token(access_token),
            ),
            consoles: Arc::new(HttpConsoleConnector::new(timeout_seconds, tls_verify)),
            datasets: Arc::new(HttpDatasetConnector::new(timeout_seconds, tls_verify)),
        }
    }
}

/// Export coordinator
pub struct ExportCoordinator {
    options: ExportOptions,
    backends: ExportBackends,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    pub fn new(options: ExportOptions, backends: ExportBackends) -> Self {
        Self { options, backends }
    }

    /// Execute the export
    ///
    /// This is the main entry point for the export process. It:
    /// 1. Acquires one console session
    /// 2. Lists all applications and applies the filter
    /// 3. Loads the dataset table when normalization is enabled
    /// 4. Creates the output directory
    /// 5. For each application:
    ///    - Exports its DSL
    ///    - Writes the raw document
    ///    - Writes the normalized document when a dataset table is loaded
    ///    - Records the outcome
    ///
    /// # Errors
    ///
    /// Returns an error if the session, the listing, the dataset table or
    /// the output directory cannot be obtained. Failures for individual
    /// applications are recorded in the returned run instead.
    pub async fn execute_export(&self) -> Result<ExportRun> {
        let start_time = Instant::now();
        let options = &self.options;

        tracing::info!(
            base_url = %options.base_url,
            output_dir = %options.output_dir.display(),
            include_secret = options.include_secret,
            normalization = options.normalization.is_enabled(),
            "Starting export process"
        );

        options.validate()?;

        let session = self
            .backends
            .sessions
            .acquire(
                &options.base_url,
                options.credentials.as_ref(),
                options.headless,
            )
            .await?;

        let console = self.backends.consoles.connect(&options.base_url, session)?;

        let mut apps = console.list_applications().await?;
        tracing::info!(count = apps.len(), "Found applications");

        if let Some(ref filter) = options.filter {
            apps.retain(|app| filter(app));
            tracing::info!(count = apps.len(), "Applications after filter");
        }

        let table = self.load_placeholder_table().await?;

        let writer = DslWriter::new(&options.output_dir);
        writer.prepare().await?;

        let mut run = ExportRun::new(&options.output_dir, table.is_some());
        let mut filenames = FilenameAllocator::new();

        for app in &apps {
            let base = filenames.allocate(&app.id, &app.name);
            let filename = raw_filename(&base);

            match self
                .export_app(console.as_ref(), app, &base, table.as_ref(), &writer)
                .await
            {
                Ok(()) => run.record(ExportResult::succeeded(app, filename)),
                Err(e) => {
                    tracing::error!(
                        app_id = %app.id,
                        app_name = %app.name,
                        error = %e,
                        "Failed to export application"
                    );
                    run.record(ExportResult::failed(app, filename, e.to_string()));
                }
            }
        }

        let run = run.with_duration(start_time.elapsed());
        run.log_summary();

        Ok(run)
    }

    /// Load the dataset table once, when normalization is enabled
    ///
    /// An empty listing leaves normalization off for the run.
    async fn load_placeholder_table(&self) -> Result<Option<PlaceholderTable>> {
        let NormalizationMode::Enabled(ref api) = self.options.normalization else {
            return Ok(None);
        };

        let source = self.backends.datasets.connect(api)?;
        let datasets = source.list_datasets().await?;

        if datasets.is_empty() {
            tracing::warn!(
                "No datasets visible to the knowledge API key, skipping normalized documents"
            );
            return Ok(None);
        }

        let table = PlaceholderTable::from_datasets(&datasets);
        tracing::info!(
            count = table.len(),
            "Loaded datasets for placeholder conversion"
        );
        Ok(Some(table))
    }

    /// Export one application and write its documents
    async fn export_app(
        &self,
        console: &dyn ConsoleApi,
        app: &Application,
        base: &str,
        table: Option<&PlaceholderTable>,
        writer: &DslWriter,
    ) -> Result<()> {
        let dsl = console
            .export_dsl(&app.id, self.options.include_secret)
            .await?;

        let raw = raw_filename(base);
        writer.write(&raw, &dsl).await?;

        match table {
            Some(table) => {
                let normalized = normalized_filename(base);
                writer
                    .write(&normalized, &replace_dataset_ids(&dsl, table))
                    .await?;
                tracing::info!(
                    app_id = %app.id,
                    app_name = %app.name,
                    raw = %raw,
                    normalized = %normalized,
                    "Exported application"
                );
            }
            None => {
                tracing::info!(
                    app_id = %app.id,
                    app_name = %app.name,
                    raw = %raw,
                    "Exported application"
                );
            }
        }

        Ok(())
    }
}
