//! Export results and run reporting
//!
//! [`ExportResult`] records the outcome for one application; [`ExportRun`]
//! collects them in application order together with run metadata.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::{Application, Result};

/// Outcome of exporting one application
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    /// Application identifier
    pub app_id: String,

    /// Application display name
    pub app_name: String,

    /// Raw document filename, relative to the output directory
    pub filename: String,

    /// Whether the export and all writes succeeded
    pub success: bool,

    /// Error message when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExportResult {
    /// Result for an application whose documents were written
    pub fn succeeded(app: &Application, filename: impl Into<String>) -> Self {
        Self {
            app_id: app.id.as_str().to_string(),
            app_name: app.name.clone(),
            filename: filename.into(),
            success: true,
            error: None,
        }
    }

    /// Result for an application whose export or write failed
    pub fn failed(app: &Application, filename: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            app_id: app.id.as_str().to_string(),
            app_name: app.name.clone(),
            filename: filename.into(),
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Results of one export run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRun {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Wall-clock duration of the run
    #[serde(rename = "durationMs", serialize_with = "serialize_millis")]
    pub duration: Duration,

    /// Whether dataset placeholders were written
    pub normalization_enabled: bool,

    /// Directory the documents were written to
    pub output_dir: PathBuf,

    /// One entry per exported application, in listing order
    pub results: Vec<ExportResult>,
}

impl ExportRun {
    /// Create an empty run starting now
    pub fn new(output_dir: impl Into<PathBuf>, normalization_enabled: bool) -> Self {
        Self {
            started_at: Utc::now(),
            duration: Duration::from_secs(0),
            normalization_enabled,
            output_dir: output_dir.into(),
            results: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Append the result for the next application
    pub fn record(&mut self, result: ExportResult) {
        self.results.push(result);
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failure_count(&self) -> usize {
        self.total() - self.success_count()
    }

    /// Failed results, in listing order
    pub fn failures(&self) -> impl Iterator<Item = &ExportResult> {
        self.results.iter().filter(|r| !r.success)
    }

    /// Check if every application was exported
    pub fn is_successful(&self) -> bool {
        self.failure_count() == 0
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.results.is_empty() {
            return 100.0;
        }
        (self.success_count() as f64 / self.total() as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total_apps = self.total(),
            successful = self.success_count(),
            failed = self.failure_count(),
            normalization_enabled = self.normalization_enabled,
            output_dir = %self.output_dir.display(),
            duration_ms = self.duration.as_millis() as u64,
            success_rate = format!("{:.2}%", self.success_rate()),
            "Export completed"
        );

        if !self.is_successful() {
            tracing::warn!(
                failed_count = self.failure_count(),
                "Export completed with errors"
            );
            for failure in self.failures() {
                tracing::warn!(
                    app_id = %failure.app_id,
                    app_name = %failure.app_name,
                    error = failure.error.as_deref().unwrap_or_default(),
                    "Export error"
                );
            }
        }
    }

    /// Write the run as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub async fn write_report(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, json).await?;

        tracing::info!(path = %path.display(), "Wrote export report");
        Ok(())
    }
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}
