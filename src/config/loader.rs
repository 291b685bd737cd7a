//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::GlucotelConfig;
use crate::domain::errors::GlucotelError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into GlucotelConfig
/// 4. Applies environment variable overrides (GLUCOTEL_* prefix)
/// 5. Validates the configuration
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use glucotel::config::loader::load_config;
///
/// let config = load_config("glucotel.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<GlucotelConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(GlucotelError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        GlucotelError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    // Perform environment variable substitution
    let contents = substitute_env_vars(&contents)?;

    // Parse TOML
    let mut config: GlucotelConfig = toml::from_str(&contents)
        .map_err(|e| GlucotelError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    // Apply environment variable overrides
    apply_env_overrides(&mut config)?;

    // Validate configuration
    config.validate().map_err(|e| {
        GlucotelError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Arguments
///
/// * `input` - String containing ${VAR} placeholders
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        // Skip comment lines - don't process env vars in comments
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(GlucotelError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using GLUCOTEL_* prefix
///
/// Environment variables follow the pattern: GLUCOTEL_<SECTION>_<KEY>
/// For example: GLUCOTEL_STORE_BASE_URL, GLUCOTEL_MFA_CODE_TTL_SECONDS
///
/// # Arguments
///
/// * `config` - Mutable reference to the configuration to update
fn apply_env_overrides(config: &mut GlucotelConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("GLUCOTEL_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("GLUCOTEL_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Store overrides
    if let Ok(val) = std::env::var("GLUCOTEL_STORE_BASE_URL") {
        config.store.base_url = val;
    }
    if let Ok(val) = std::env::var("GLUCOTEL_STORE_API_KEY") {
        config.store.api_key = Some(crate::config::secret_string(val));
    }
    if let Ok(val) = std::env::var("GLUCOTEL_STORE_REQUEST_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.store.request_timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("GLUCOTEL_STORE_TLS_VERIFY") {
        config.store.tls_verify = val.parse().unwrap_or(true);
    }

    // Monitoring overrides
    if let Ok(val) = std::env::var("GLUCOTEL_MONITORING_WINDOW_DAYS") {
        if let Ok(days) = val.parse() {
            config.monitoring.window_days = days;
        }
    }

    // MFA overrides
    if let Ok(val) = std::env::var("GLUCOTEL_MFA_CODE_TTL_SECONDS") {
        if let Ok(ttl) = val.parse() {
            config.mfa.code_ttl_seconds = ttl;
        }
    }
    if let Ok(val) = std::env::var("GLUCOTEL_MFA_RESEND_WINDOW_SECONDS") {
        if let Ok(window) = val.parse() {
            config.mfa.resend_window_seconds = window;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("GLUCOTEL_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("GLUCOTEL_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("GLUCOTEL_TEST_VAR", "test_value");
        let input = "api_key = \"${GLUCOTEL_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "api_key = \"test_value\"\n");
        std::env::remove_var("GLUCOTEL_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("GLUCOTEL_MISSING_VAR");
        let input = "api_key = \"${GLUCOTEL_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# uses ${SOME_UNSET_VAR} in a comment\nlog_level = \"info\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${SOME_UNSET_VAR}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "info"

[store]
backend = "memory"

[thresholds]
hypo = 0.6
fasting_normal = 0.95

[mfa]
code_ttl_seconds = 180
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_ok());

        let config = result.unwrap();
        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.mfa.code_ttl_seconds, 180);
    }

    #[test]
    fn test_load_config_invalid_thresholds() {
        let toml_content = r#"
[application]
log_level = "info"

[store]
backend = "memory"

[thresholds]
fasting_normal = 0.95
fasting_warning = 0.90
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }
}
