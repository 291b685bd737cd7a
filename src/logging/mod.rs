//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - JSON-formatted logs
//! - Configurable log levels
//! - Local file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use glucotel::logging::init_logging;
//! use glucotel::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! // Use tracing macros for logging
//! tracing::info!("Application started");
//! tracing::error!(error = "Something went wrong", "Error occurred");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of an aggregation pass for a patient
///
/// # Example
///
/// ```no_run
/// use glucotel::log_overview_start;
/// use glucotel::domain::ids::PatientId;
///
/// let patient_id = PatientId::new("patient-123").unwrap();
/// log_overview_start!(&patient_id);
/// ```
#[macro_export]
macro_rules! log_overview_start {
    ($patient_id:expr) => {
        tracing::info!(
            patient_id = %$patient_id,
            "Starting patient overview"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use glucotel::log_error_with_context;
/// use glucotel::domain::GlucotelError;
///
/// let error = GlucotelError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
