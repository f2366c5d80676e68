//! Configuration management for the exporter.
//!
//! # Overview
//!
//! Configuration comes from an optional TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `DSL_EXPORTER_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting except the console base URL
//! - Validation of every section
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dsl_exporter::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("dsl-exporter.toml")?;
//!
//! println!("Console: {}", config.console.base_url);
//! println!("Output: {}", config.export.output_dir);
//! if config.knowledge.is_complete() {
//!     println!("Dataset placeholders enabled");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`ConsoleConfig`] - Console URL, credentials and HTTP settings
//! - [`ExportConfig`] - Output directory, app filters, report path
//! - [`KnowledgeConfig`] - Knowledge API used to resolve dataset names
//! - [`LoggingConfig`] - Optional JSON file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [console]
//! base_url = "https://dify.example.com"
//! email = "admin@example.com"
//! password = "${DIFY_PASSWORD}"
//!
//! [export]
//! output_dir = "./dsl"
//! modes = ["workflow", "advanced-chat"]
//!
//! [knowledge]
//! api_url = "https://dify.example.com/v1"
//! api_key = "${DIFY_DATASET_API_KEY}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default};
pub use schema::{
    ApplicationConfig, ConsoleConfig, ExportConfig, ExporterConfig, KnowledgeConfig,
    LoggingConfig,
};
pub use secret::{redact, secret_string, SecretString, SecretValue};
