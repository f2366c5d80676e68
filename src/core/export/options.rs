//! Export run options
//!
//! Everything the coordinator needs for one run, decided up front: where to
//! connect, where to write, which applications to export and whether dataset
//! placeholders are produced.

use crate::adapters::console::Credentials;
use crate::adapters::knowledge::DatasetApiConfig;
use crate::config::SecretString;
use crate::domain::{AppMode, Application, ExporterError, Result};
use regex::Regex;
use std::fmt;
use std::path::PathBuf;

/// Predicate selecting the applications to export
pub type AppFilter = Box<dyn Fn(&Application) -> bool + Send + Sync>;

/// Whether normalized documents are produced in this run
#[derive(Debug, Clone)]
pub enum NormalizationMode {
    Disabled,
    Enabled(DatasetApiConfig),
}

impl NormalizationMode {
    /// Enabled only when both the knowledge API URL and key are present
    pub fn from_parts(api_url: Option<String>, api_key: Option<SecretString>) -> Self {
        match (api_url, api_key) {
            (Some(url), Some(key)) if !url.trim().is_empty() => {
                NormalizationMode::Enabled(DatasetApiConfig::new(url, key))
            }
            (Some(_), None) | (None, Some(_)) => {
                tracing::warn!(
                    "Only one of knowledge API URL and key is set, dataset placeholders disabled"
                );
                NormalizationMode::Disabled
            }
            _ => NormalizationMode::Disabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, NormalizationMode::Enabled(_))
    }
}

/// Options for one export run
pub struct ExportOptions {
    /// Console base URL
    pub base_url: String,

    /// Directory receiving the documents
    pub output_dir: PathBuf,

    /// Login credentials; missing parts are prompted for unless `headless`
    pub credentials: Option<Credentials>,

    /// Include secret-bearing fields in the exported documents
    pub include_secret: bool,

    /// Never prompt on the terminal
    pub headless: bool,

    /// Optional application filter
    pub filter: Option<AppFilter>,

    /// Dataset placeholder mode
    pub normalization: NormalizationMode,
}

impl ExportOptions {
    /// Options with no credentials, no filter and normalization disabled
    pub fn new(base_url: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            output_dir: output_dir.into(),
            credentials: None,
            include_secret: false,
            headless: false,
            filter: None,
            normalization: NormalizationMode::Disabled,
        }
    }

    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_include_secret(mut self, include_secret: bool) -> Self {
        self.include_secret = include_secret;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_filter(mut self, filter: Option<AppFilter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_normalization(mut self, normalization: NormalizationMode) -> Self {
        self.normalization = normalization;
        self
    }

    /// Check the options before any network call is made
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a missing or non-HTTP base URL or
    /// an empty output directory
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url).map_err(|e| {
            ExporterError::Configuration(format!("Invalid console base URL '{}': {e}", self.base_url))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ExporterError::Configuration(format!(
                "Console base URL must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ExporterError::Configuration(
                "Output directory cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for ExportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportOptions")
            .field("base_url", &self.base_url)
            .field("output_dir", &self.output_dir)
            .field("credentials", &self.credentials)
            .field("include_secret", &self.include_secret)
            .field("headless", &self.headless)
            .field("filter", &self.filter.is_some())
            .field("normalization", &self.normalization)
            .finish()
    }
}

/// Builds an [`AppFilter`] from mode, ID and name criteria
///
/// Criteria are combined with AND; an empty criterion matches everything.
#[derive(Debug, Default)]
pub struct AppFilterBuilder {
    modes: Vec<AppMode>,
    app_ids: Vec<String>,
    name_pattern: Option<Regex>,
}

impl AppFilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only applications of these modes
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown mode name
    pub fn modes<S: AsRef<str>>(mut self, modes: &[S]) -> Result<Self> {
        for mode in modes {
            let mode = mode
                .as_ref()
                .parse::<AppMode>()
                .map_err(ExporterError::Validation)?;
            self.modes.push(mode);
        }
        Ok(self)
    }

    /// Only applications with these IDs
    pub fn app_ids<S: AsRef<str>>(mut self, app_ids: &[S]) -> Self {
        self.app_ids
            .extend(app_ids.iter().map(|id| id.as_ref().to_string()));
        self
    }

    /// Only applications whose name matches `pattern`
    ///
    /// # Errors
    ///
    /// Returns a validation error if `pattern` is not a valid regex
    pub fn name_pattern(mut self, pattern: Option<&str>) -> Result<Self> {
        if let Some(pattern) = pattern {
            let regex = Regex::new(pattern).map_err(|e| {
                ExporterError::Validation(format!("Invalid name pattern '{pattern}': {e}"))
            })?;
            self.name_pattern = Some(regex);
        }
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty() && self.app_ids.is_empty() && self.name_pattern.is_none()
    }

    /// The filter, or `None` when no criterion was given
    pub fn build(self) -> Option<AppFilter> {
        if self.is_empty() {
            return None;
        }

        let Self {
            modes,
            app_ids,
            name_pattern,
        } = self;

        Some(Box::new(move |app: &Application| {
            (modes.is_empty() || modes.contains(&app.mode))
                && (app_ids.is_empty() || app_ids.iter().any(|id| id == app.id.as_str()))
                && name_pattern
                    .as_ref()
                    .map_or(true, |re| re.is_match(&app.name))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use crate::domain::AppId;

    fn app(id: &str, name: &str, mode: AppMode) -> Application {
        Application::new(AppId::new(id).unwrap(), name, mode)
    }

    #[test]
    fn test_normalization_requires_both_parts() {
        let key = || Some(secret_string("dataset-key".to_string()));
        let url = || Some("https://api.dify.ai/v1".to_string());

        assert!(NormalizationMode::from_parts(url(), key()).is_enabled());
        assert!(!NormalizationMode::from_parts(url(), None).is_enabled());
        assert!(!NormalizationMode::from_parts(None, key()).is_enabled());
        assert!(!NormalizationMode::from_parts(None, None).is_enabled());
    }

    #[test]
    fn test_options_validate() {
        assert!(ExportOptions::new("https://dify.example.com", "./dsl")
            .validate()
            .is_ok());
        assert!(ExportOptions::new("", "./dsl").validate().is_err());
        assert!(ExportOptions::new("ftp://dify.example.com", "./dsl")
            .validate()
            .is_err());
        assert!(ExportOptions::new("https://dify.example.com", "")
            .validate()
            .is_err());
    }

    #[test]
    fn test_empty_builder_yields_no_filter() {
        assert!(AppFilterBuilder::new().build().is_none());
    }

    #[test]
    fn test_filter_by_mode() {
        let filter = AppFilterBuilder::new()
            .modes(&["workflow"])
            .unwrap()
            .build()
            .unwrap();

        assert!(filter(&app("a1", "Flow", AppMode::Workflow)));
        assert!(!filter(&app("a2", "Chat", AppMode::Chat)));
    }

    #[test]
    fn test_filter_combines_criteria() {
        let filter = AppFilterBuilder::new()
            .app_ids(&["a1", "a2"])
            .name_pattern(Some("^Prod"))
            .unwrap()
            .build()
            .unwrap();

        assert!(filter(&app("a1", "Prod Bot", AppMode::Chat)));
        assert!(!filter(&app("a2", "Staging Bot", AppMode::Chat)));
        assert!(!filter(&app("a3", "Prod Other", AppMode::Chat)));
    }

    #[test]
    fn test_filter_rejects_bad_input() {
        assert!(AppFilterBuilder::new().modes(&["spreadsheet"]).is_err());
        assert!(AppFilterBuilder::new().name_pattern(Some("(")).is_err());
    }
}
