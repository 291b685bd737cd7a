//! Domain error types
//!
//! This module defines the error hierarchy for Glucotel. All errors are
//! domain-specific and don't expose third-party types.
//!
//! Authentication failures are intentionally coarse: wrong email, wrong
//! password, and wrong MFA code all surface as the same
//! [`AuthError::InvalidCredential`] message so callers cannot learn which
//! factor failed.

use thiserror::Error;

/// Main Glucotel error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum GlucotelError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors (malformed input rejected before domain logic runs)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication errors (login and MFA)
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Tracking-code linking errors
    #[error("Linking error: {0}")]
    Link(#[from] LinkError),

    /// Resource store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Messaging errors
    #[error("Messaging error: {0}")]
    Messaging(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Authentication errors
///
/// [`AuthError::InvalidCredential`] carries one fixed message regardless of
/// which check failed (unknown email, wrong password, or wrong MFA code) so
/// nothing about internal state leaks to the end user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Wrong email, password, or MFA code — reported identically
    #[error("Email ou mot de passe incorrect")]
    InvalidCredential,

    /// The MFA code is past its expiry; a new code must be issued
    #[error("Code expiré, veuillez demander un nouveau code")]
    Expired,

    /// Resend requested while the current code still has more than the
    /// resend window remaining
    #[error("Resend throttled: {remaining_seconds}s until a new code may be requested")]
    ResendThrottled { remaining_seconds: i64 },

    /// Verification attempted with no challenge outstanding
    #[error("No pending MFA challenge for this doctor")]
    NoPendingChallenge,
}

/// Tracking-code redemption errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    /// No tracking code record matches the submitted code
    #[error("Tracking code not found")]
    NotFound,

    /// The code has already been redeemed
    #[error("Tracking code already consumed")]
    AlreadyConsumed,
}

/// Resource store errors
///
/// Errors that occur when talking to the external persistence collaborator.
/// These errors don't expose the underlying HTTP client types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to connect to the store
    #[error("Failed to connect to store: {0}")]
    ConnectionFailed(String),

    /// Entity not found
    #[error("Not found: {resource}/{id}")]
    NotFound { resource: String, id: String },

    /// Conditional update lost the race (precondition no longer held)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The store returned a payload that doesn't match the entity shape
    #[error("Invalid response from store: {0}")]
    InvalidResponse(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for GlucotelError {
    fn from(err: std::io::Error) -> Self {
        GlucotelError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for GlucotelError {
    fn from(err: serde_json::Error) -> Self {
        GlucotelError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for GlucotelError {
    fn from(err: toml::de::Error) -> Self {
        GlucotelError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glucotel_error_display() {
        let err = GlucotelError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_auth_error_conversion() {
        let auth_err = AuthError::Expired;
        let err: GlucotelError = auth_err.into();
        assert!(matches!(err, GlucotelError::Auth(_)));
    }

    #[test]
    fn test_invalid_credential_message_is_generic() {
        // One message for every failed factor; nothing leaks
        let err = AuthError::InvalidCredential;
        assert_eq!(err.to_string(), "Email ou mot de passe incorrect");
    }

    #[test]
    fn test_link_error_conversion() {
        let link_err = LinkError::AlreadyConsumed;
        let err: GlucotelError = link_err.into();
        assert!(matches!(err, GlucotelError::Link(LinkError::AlreadyConsumed)));
    }

    #[test]
    fn test_store_error_conversion() {
        let store_err = StoreError::NotFound {
            resource: "patients".to_string(),
            id: "p-1".to_string(),
        };
        let err: GlucotelError = store_err.into();
        assert!(matches!(err, GlucotelError::Store(_)));
        assert!(err.to_string().contains("patients/p-1"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: GlucotelError = io_err.into();
        assert!(matches!(err, GlucotelError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: GlucotelError = json_err.into();
        assert!(matches!(err, GlucotelError::Serialization(_)));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let err = GlucotelError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;

        let err = AuthError::NoPendingChallenge;
        let _: &dyn std::error::Error = &err;

        let err = StoreError::Timeout("30s".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
