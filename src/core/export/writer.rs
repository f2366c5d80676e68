//! Output directory writer for DSL documents

use crate::domain::{ExporterError, Result};
use std::path::{Path, PathBuf};

/// Extension of raw documents
pub const RAW_EXTENSION: &str = "yml";

/// Extension of documents with dataset placeholders
pub const NORMALIZED_EXTENSION: &str = "normalized.yml";

/// Raw document filename for a base name
pub fn raw_filename(base: &str) -> String {
    format!("{base}.{RAW_EXTENSION}")
}

/// Normalized document filename for a base name
pub fn normalized_filename(base: &str) -> String {
    format!("{base}.{NORMALIZED_EXTENSION}")
}

/// Writes whole documents into one output directory
#[derive(Debug, Clone)]
pub struct DslWriter {
    output_dir: PathBuf,
}

impl DslWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the output directory and any missing parents
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created, for example
    /// when a regular file already sits at the path
    pub async fn prepare(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| {
                ExporterError::Io(format!(
                    "Failed to create output directory {}: {e}",
                    self.output_dir.display()
                ))
            })?;

        tracing::debug!(path = %self.output_dir.display(), "Output directory ready");
        Ok(())
    }

    /// Write `contents` to `filename` inside the output directory
    ///
    /// # Errors
    ///
    /// Returns an I/O error naming the file if the write fails
    pub async fn write(&self, filename: &str, contents: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(filename);
        tokio::fs::write(&path, contents).await.map_err(|e| {
            ExporterError::Io(format!("Failed to write {}: {e}", path.display()))
        })?;
        Ok(path)
    }
}
