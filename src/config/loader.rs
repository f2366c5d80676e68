//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ExporterConfig;
use super::secret::secret_string;
use crate::domain::errors::ExporterError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Prefix of environment variables that override configuration values
pub const ENV_PREFIX: &str = "DSL_EXPORTER";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`ExporterConfig`]
/// 4. Applies environment variable overrides (`DSL_EXPORTER_*`)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns a configuration error if the file cannot be read or parsed, if a
/// referenced variable is not set, or if validation fails.
///
/// # Examples
///
/// ```no_run
/// use dsl_exporter::config::loader::load_config;
///
/// let config = load_config("dsl-exporter.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ExporterConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ExporterError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ExporterError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: ExporterConfig = toml::from_str(&contents)
        .map_err(|e| ExporterError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        ExporterError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Loads configuration from an optional file path
///
/// Without a path the built-in defaults are used; environment overrides and
/// validation apply either way.
pub fn load_config_or_default(path: Option<&str>) -> Result<ExporterConfig> {
    match path {
        Some(path) => load_config(path),
        None => {
            let mut config = ExporterConfig::default();
            apply_env_overrides(&mut config);
            config.validate().map_err(|e| {
                ExporterError::Configuration(format!("Configuration validation failed: {e}"))
            })?;
            Ok(config)
        }
    }
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are copied through untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ExporterError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ExporterError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_var(section: &str, key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{section}_{key}")).ok()
}

/// Applies environment variable overrides
///
/// Variables follow the pattern `DSL_EXPORTER_<SECTION>_<KEY>`, for example
/// `DSL_EXPORTER_CONSOLE_BASE_URL` or `DSL_EXPORTER_KNOWLEDGE_API_KEY`.
fn apply_env_overrides(config: &mut ExporterConfig) {
    if let Some(val) = env_var("APPLICATION", "LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Console overrides
    if let Some(val) = env_var("CONSOLE", "BASE_URL") {
        config.console.base_url = val;
    }
    if let Some(val) = env_var("CONSOLE", "EMAIL") {
        config.console.email = Some(val);
    }
    if let Some(val) = env_var("CONSOLE", "PASSWORD") {
        config.console.password = Some(secret_string(val));
    }
    if let Some(val) = env_var("CONSOLE", "ACCESS_TOKEN") {
        config.console.access_token = Some(secret_string(val));
    }
    if let Some(val) = env_var("CONSOLE", "HEADLESS") {
        config.console.headless = val.parse().unwrap_or(false);
    }
    if let Some(val) = env_var("CONSOLE", "TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.console.timeout_seconds = timeout;
        }
    }
    if let Some(val) = env_var("CONSOLE", "TLS_VERIFY") {
        config.console.tls_verify = val.parse().unwrap_or(true);
    }

    // Export overrides
    if let Some(val) = env_var("EXPORT", "OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Some(val) = env_var("EXPORT", "INCLUDE_SECRET") {
        config.export.include_secret = val.parse().unwrap_or(false);
    }
    if let Some(val) = env_var("EXPORT", "MODES") {
        config.export.modes = split_list(&val);
    }

    // Knowledge overrides
    if let Some(val) = env_var("KNOWLEDGE", "API_URL") {
        config.knowledge.api_url = Some(val);
    }
    if let Some(val) = env_var("KNOWLEDGE", "API_KEY") {
        config.knowledge.api_key = Some(secret_string(val));
    }

    // Logging overrides
    if let Some(val) = env_var("LOGGING", "LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Some(val) = env_var("LOGGING", "LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

/// Split a comma-separated list, dropping empty entries
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("DSLX_LOADER_TEST_VAR", "test_value");
        let input = "password = \"${DSLX_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"\n");
        std::env::remove_var("DSLX_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("DSLX_LOADER_MISSING_VAR");
        let input = "password = \"${DSLX_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("DSLX_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("DSLX_LOADER_COMMENTED");
        let input = "# api_key = \"${DSLX_LOADER_COMMENTED}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("workflow, chat,,advanced-chat "),
            vec!["workflow", "chat", "advanced-chat"]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-dsl-exporter.toml");
        assert!(matches!(result, Err(ExporterError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[console]
base_url = "https://dify.example.com"
email = "admin@example.com"
password = "pass"

[export]
output_dir = "/tmp/dsl"
modes = ["workflow"]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.console.base_url, "https://dify.example.com");
        assert_eq!(config.export.modes, vec!["workflow"]);
        assert!(!config.knowledge.is_complete());
    }

    #[test]
    fn test_load_config_invalid_values() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[application]\nlog_level = \"loud\"\n")
            .unwrap();
        temp_file.flush().unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("validation failed"));
    }
}
