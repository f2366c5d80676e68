//! Configuration schema types
//!
//! This module defines the configuration structure that maps to the TOML file.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Main exporter configuration
///
/// Every section has defaults, so an empty file (or no file at all) yields a
/// configuration that only lacks the console base URL.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExporterConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Console connection settings
    #[serde(default)]
    pub console: ConsoleConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Knowledge API settings used for placeholder normalization
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ExporterConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.console.validate()?;
        self.export.validate()?;
        self.knowledge.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Console connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Base URL of the console, e.g. `https://dify.example.com`
    #[serde(default)]
    pub base_url: String,

    /// Login email (optional; prompted for when absent)
    #[serde(default)]
    pub email: Option<String>,

    /// Login password (optional)
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub password: Option<SecretString>,

    /// Pre-issued console access token; skips the login call when set
    #[serde(default)]
    pub access_token: Option<SecretString>,

    /// Never prompt on the terminal for missing credentials
    #[serde(default)]
    pub headless: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification enabled
    ///
    /// Disabling verification is only meant for self-hosted consoles with
    /// self-signed certificates.
    #[serde(default = "default_true")]
    pub tls_verify: bool,
}

impl ConsoleConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if !self.base_url.is_empty() {
            validate_http_url("console.base_url", &self.base_url)?;
        }

        if self.email.as_ref().is_some_and(|e| e.trim().is_empty()) {
            return Err("console.email cannot be empty when set".to_string());
        }

        if let Some(ref password) = self.password {
            if password.expose_secret().is_empty() {
                return Err("console.password cannot be empty when set".to_string());
            }
            if self.email.is_none() {
                return Err("console.password requires console.email".to_string());
            }
        }

        if self.timeout_seconds == 0 {
            return Err("console.timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }

    /// Check that a base URL is present; only required when actually exporting
    pub fn require_base_url(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err(
                "console.base_url is required (set it in the config file or pass --base-url)"
                    .to_string(),
            );
        }
        Ok(())
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            email: None,
            password: None,
            access_token: None,
            headless: false,
            timeout_seconds: default_timeout_seconds(),
            tls_verify: true,
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory the DSL files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Include secret-bearing fields (API keys of tools, env vars) in the export
    #[serde(default)]
    pub include_secret: bool,

    /// Only export apps of these modes (empty = all)
    #[serde(default)]
    pub modes: Vec<String>,

    /// Only export apps with these IDs (empty = all)
    #[serde(default)]
    pub app_ids: Vec<String>,

    /// Only export apps whose name matches this regular expression
    #[serde(default)]
    pub name_pattern: Option<String>,

    /// Write a JSON report of the run to this path
    #[serde(default)]
    pub report_path: Option<String>,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_dir.trim().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }

        for mode in &self.modes {
            mode.parse::<crate::domain::AppMode>()
                .map_err(|e| format!("export.modes: {e}"))?;
        }

        if let Some(ref pattern) = self.name_pattern {
            regex::Regex::new(pattern)
                .map_err(|e| format!("export.name_pattern is not a valid regex: {e}"))?;
        }

        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            include_secret: false,
            modes: vec![],
            app_ids: vec![],
            name_pattern: None,
            report_path: None,
        }
    }
}

/// Knowledge API configuration
///
/// Normalization is enabled only when both `api_url` and `api_key` are set.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KnowledgeConfig {
    /// Base URL of the knowledge API, e.g. `https://api.dify.ai/v1`
    #[serde(default)]
    pub api_url: Option<String>,

    /// Knowledge API key
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub api_key: Option<SecretString>,
}

impl KnowledgeConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if let Some(ref url) = self.api_url {
            validate_http_url("knowledge.api_url", url)?;
        }

        if self
            .api_key
            .as_ref()
            .is_some_and(|k| k.expose_secret().is_empty())
        {
            return Err("knowledge.api_key cannot be empty when set".to_string());
        }

        Ok(())
    }

    /// Whether both halves of the knowledge API pair are present
    pub fn is_complete(&self) -> bool {
        self.api_url.is_some() && self.api_key.is_some()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when file logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<(), String> {
    let parsed = url::Url::parse(value).map_err(|e| format!("{field} is not a valid URL: {e}"))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(format!("{field} must start with http:// or https://"));
    }
    Ok(())
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_output_dir() -> String {
    "./dsl".to_string()
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
