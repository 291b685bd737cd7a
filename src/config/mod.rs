//! Configuration management for Glucotel.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! Glucotel uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for optional settings
//! - Comprehensive validation
//! - Type-safe configuration structs
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use glucotel::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("glucotel.toml")?;
//!
//! println!("Store URL: {}", config.store.base_url);
//! println!("MFA code TTL: {}s", config.mfa.code_ttl_seconds);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level, dry run)
//! - [`StoreConfig`] - Resource store backend and credentials
//! - [`ThresholdsConfig`] - Glycemia classification thresholds
//! - [`MonitoringConfig`] - Aggregation window and adherence expectations
//! - [`MfaConfig`] - MFA code lifetime and resend policy
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [store]
//! backend = "rest"
//! base_url = "https://api.example.com"
//! api_key = "${GLUCOTEL_STORE_API_KEY}"
//!
//! [thresholds]
//! hypo = 0.6
//! fasting_normal = 0.95
//! fasting_warning = 1.05
//! post_meal_normal = 1.2
//! post_meal_warning = 1.4
//!
//! [mfa]
//! code_ttl_seconds = 180
//! resend_window_seconds = 60
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, Environment, GlucotelConfig, LoggingConfig, MfaConfig, MonitoringConfig,
    StoreBackend, StoreConfig, ThresholdsConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
