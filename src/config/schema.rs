//! Configuration schema types
//!
//! This module defines the configuration structure for Glucotel.

use crate::config::SecretString;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Resource store backend selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// JSON REST backend
    Rest,
    /// In-memory backend (tests and local development)
    Memory,
}

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Main Glucotel configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlucotelConfig {
    /// Application-level settings
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Resource store configuration
    pub store: StoreConfig,

    /// Glycemia classification thresholds
    #[serde(default)]
    pub thresholds: ThresholdsConfig,

    /// Monitoring window and adherence expectations
    #[serde(default)]
    pub monitoring: MonitoringConfig,

    /// MFA challenge policy
    #[serde(default)]
    pub mfa: MfaConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GlucotelConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.store.validate(&self.environment)?;
        self.thresholds.validate()?;
        self.monitoring.validate()?;
        self.mfa.validate()?;
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

    /// Dry run mode (compute aggregates but don't write them back)
    #[serde(default)]
    pub dry_run: bool,
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
            dry_run: false,
        }
    }
}

/// Resource store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend implementation to use
    #[serde(default = "default_store_backend")]
    pub backend: StoreBackend,

    /// Base URL of the REST backend
    #[serde(default = "default_store_base_url")]
    pub base_url: String,

    /// Optional API key sent as X-Api-Key
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// TLS certificate verification enabled
    ///
    /// Must stay `true` in production (enforced by validation); only
    /// disable against local development servers with self-signed
    /// certificates.
    #[serde(default = "default_true")]
    pub tls_verify: bool,
}

impl StoreConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        if self.backend == StoreBackend::Rest {
            if self.base_url.is_empty() {
                return Err("store.base_url cannot be empty".to_string());
            }
            if url::Url::parse(&self.base_url).is_err() {
                return Err(format!("store.base_url is not a valid URL: {}", self.base_url));
            }
            if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
                return Err("store.base_url must start with http:// or https://".to_string());
            }
        }

        if self.request_timeout_seconds == 0 {
            return Err("store.request_timeout_seconds must be greater than 0".to_string());
        }

        if *environment == Environment::Production && !self.tls_verify {
            return Err(
                "TLS certificate verification cannot be disabled in production environments. \
                For development/testing, set 'environment = \"development\"' or \
                'environment = \"staging\"'."
                    .to_string(),
            );
        }

        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            base_url: default_store_base_url(),
            api_key: None,
            request_timeout_seconds: default_timeout_seconds(),
            tls_verify: true,
        }
    }
}

/// Glycemia classification thresholds, in g/L
///
/// These are the deployment-wide defaults; a patient's own `targetRange`
/// overrides the normal bounds while the tiering logic stays the same.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    /// Hard hypoglycemia floor; any value strictly below is `hypo`
    #[serde(default = "default_hypo")]
    pub hypo: Decimal,

    /// Upper bound of `normal` for fasting/pre-meal readings
    #[serde(default = "default_fasting_normal")]
    pub fasting_normal: Decimal,

    /// Upper bound of `warning` for fasting/pre-meal readings
    #[serde(default = "default_fasting_warning")]
    pub fasting_warning: Decimal,

    /// Upper bound of `normal` for post-meal readings
    #[serde(default = "default_post_meal_normal")]
    pub post_meal_normal: Decimal,

    /// Upper bound of `warning` for post-meal readings
    #[serde(default = "default_post_meal_warning")]
    pub post_meal_warning: Decimal,
}

impl ThresholdsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.hypo <= Decimal::ZERO {
            return Err("thresholds.hypo must be positive".to_string());
        }
        if self.fasting_normal <= self.hypo {
            return Err("thresholds.fasting_normal must be above thresholds.hypo".to_string());
        }
        if self.fasting_warning <= self.fasting_normal {
            return Err(
                "thresholds.fasting_warning must be above thresholds.fasting_normal".to_string(),
            );
        }
        if self.post_meal_normal <= self.hypo {
            return Err("thresholds.post_meal_normal must be above thresholds.hypo".to_string());
        }
        if self.post_meal_warning <= self.post_meal_normal {
            return Err(
                "thresholds.post_meal_warning must be above thresholds.post_meal_normal"
                    .to_string(),
            );
        }
        Ok(())
    }
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            hypo: default_hypo(),
            fasting_normal: default_fasting_normal(),
            fasting_warning: default_fasting_warning(),
            post_meal_normal: default_post_meal_normal(),
            post_meal_warning: default_post_meal_warning(),
        }
    }
}

/// Monitoring window and adherence expectations
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Length of the aggregation window in days
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    /// Expected readings per week in `classique` mode (4/day)
    #[serde(default = "default_expected_classique")]
    pub expected_classique: u32,

    /// Expected readings per week in `lean` mode (2/day)
    #[serde(default = "default_expected_lean")]
    pub expected_lean: u32,

    /// Expected readings per week in `strict` mode (6/day)
    #[serde(default = "default_expected_strict")]
    pub expected_strict: u32,
}

impl MonitoringConfig {
    fn validate(&self) -> Result<(), String> {
        if self.window_days == 0 {
            return Err("monitoring.window_days must be greater than 0".to_string());
        }
        if self.expected_classique == 0 || self.expected_lean == 0 || self.expected_strict == 0 {
            return Err("monitoring.expected_* values must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            expected_classique: default_expected_classique(),
            expected_lean: default_expected_lean(),
            expected_strict: default_expected_strict(),
        }
    }
}

/// MFA challenge policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MfaConfig {
    /// Lifetime of an issued code, in seconds
    #[serde(default = "default_code_ttl_seconds")]
    pub code_ttl_seconds: u64,

    /// Resend is permitted only once remaining TTL drops to this many
    /// seconds. A UX throttle against eager resend clicking, not a
    /// security control.
    #[serde(default = "default_resend_window_seconds")]
    pub resend_window_seconds: u64,
}

impl MfaConfig {
    fn validate(&self) -> Result<(), String> {
        if self.code_ttl_seconds == 0 {
            return Err("mfa.code_ttl_seconds must be greater than 0".to_string());
        }
        if self.resend_window_seconds > self.code_ttl_seconds {
            return Err(
                "mfa.resend_window_seconds cannot exceed mfa.code_ttl_seconds".to_string(),
            );
        }
        Ok(())
    }
}

impl Default for MfaConfig {
    fn default() -> Self {
        Self {
            code_ttl_seconds: default_code_ttl_seconds(),
            resend_window_seconds: default_resend_window_seconds(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Log file rotation (daily, hourly)
    #[serde(default = "default_rotation")]
    pub local_rotation: String,

    /// Maximum size of a log file in MB
    #[serde(default = "default_max_size_mb")]
    pub local_max_size_mb: u64,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".into());
        }
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_log_path(),
            local_rotation: default_rotation(),
            local_max_size_mb: default_max_size_mb(),
        }
    }
}

// Default value functions

fn default_log_level() -> String {
    "info".to_string()
}

fn default_store_backend() -> StoreBackend {
    StoreBackend::Rest
}

fn default_store_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_hypo() -> Decimal {
    dec!(0.6)
}

fn default_fasting_normal() -> Decimal {
    dec!(0.95)
}

fn default_fasting_warning() -> Decimal {
    dec!(1.05)
}

fn default_post_meal_normal() -> Decimal {
    dec!(1.2)
}

fn default_post_meal_warning() -> Decimal {
    dec!(1.4)
}

fn default_window_days() -> u32 {
    7
}

fn default_expected_classique() -> u32 {
    28
}

fn default_expected_lean() -> u32 {
    14
}

fn default_expected_strict() -> u32 {
    42
}

fn default_code_ttl_seconds() -> u64 {
    180
}

fn default_resend_window_seconds() -> u64 {
    60
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

fn default_max_size_mb() -> u64 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_config() -> GlucotelConfig {
        GlucotelConfig {
            application: ApplicationConfig::default(),
            environment: Environment::Development,
            store: StoreConfig::default(),
            thresholds: ThresholdsConfig::default(),
            monitoring: MonitoringConfig::default(),
            mfa: MfaConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(minimal_config().validate().is_ok());
    }

    #[test]
    fn test_default_thresholds_match_clinical_defaults() {
        let thresholds = ThresholdsConfig::default();
        assert_eq!(thresholds.hypo, dec!(0.6));
        assert_eq!(thresholds.fasting_normal, dec!(0.95));
        assert_eq!(thresholds.fasting_warning, dec!(1.05));
        assert_eq!(thresholds.post_meal_normal, dec!(1.2));
        assert_eq!(thresholds.post_meal_warning, dec!(1.4));
    }

    #[test]
    fn test_default_expectations_match_mode_table() {
        let monitoring = MonitoringConfig::default();
        assert_eq!(monitoring.expected_classique, 28);
        assert_eq!(monitoring.expected_lean, 14);
        assert_eq!(monitoring.expected_strict, 42);
        assert_eq!(monitoring.window_days, 7);
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = minimal_config();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let mut config = minimal_config();
        config.thresholds.fasting_warning = dec!(0.90);
        let err = config.validate().unwrap_err();
        assert!(err.contains("fasting_warning"));
    }

    #[test]
    fn test_empty_base_url_rejected_for_rest_backend() {
        let mut config = minimal_config();
        config.store.base_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_memory_backend_needs_no_base_url() {
        let mut config = minimal_config();
        config.store.backend = StoreBackend::Memory;
        config.store.base_url = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tls_verify_enforced_in_production() {
        let mut config = minimal_config();
        config.environment = Environment::Production;
        config.store.tls_verify = false;
        assert!(config.validate().is_err());

        config.store.tls_verify = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resend_window_cannot_exceed_ttl() {
        let mut config = minimal_config();
        config.mfa.resend_window_seconds = 200;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mfa_defaults() {
        let mfa = MfaConfig::default();
        assert_eq!(mfa.code_ttl_seconds, 180);
        assert_eq!(mfa.resend_window_seconds, 60);
    }
}
