//! Domain identifier types with validation
//!
//! This module provides newtype wrappers for the identifiers used across the
//! monitoring domain. Each type ensures type safety so a patient identifier
//! can never be passed where a doctor identifier is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Patient identifier newtype wrapper
///
/// Represents a unique identifier for a monitored patient account.
/// Typically a UUID but the store may use any non-empty string.
///
/// # Examples
///
/// ```
/// use glucotel::domain::ids::PatientId;
/// use std::str::FromStr;
///
/// let patient_id = PatientId::from_str("7d44b88c-4199-4bad-97dc-d78268e01398").unwrap();
/// assert_eq!(patient_id.as_str(), "7d44b88c-4199-4bad-97dc-d78268e01398");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatientId(String);

impl PatientId {
    /// Creates a new PatientId from a string
    ///
    /// # Arguments
    ///
    /// * `id` - The patient identifier string
    ///
    /// # Returns
    ///
    /// Returns `Ok(PatientId)` if the ID is valid, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Patient ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the patient ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PatientId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Doctor identifier newtype wrapper
///
/// Represents a unique identifier for a supervising physician account.
///
/// # Examples
///
/// ```
/// use glucotel::domain::ids::DoctorId;
/// use std::str::FromStr;
///
/// let doctor_id = DoctorId::from_str("dr-1042").unwrap();
/// assert_eq!(doctor_id.as_str(), "dr-1042");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoctorId(String);

impl DoctorId {
    /// Creates a new DoctorId from a string
    ///
    /// # Arguments
    ///
    /// * `id` - The doctor identifier string
    ///
    /// # Returns
    ///
    /// Returns `Ok(DoctorId)` if the ID is valid, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Doctor ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the doctor ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DoctorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DoctorId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for DoctorId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Reading identifier newtype wrapper
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReadingId(String);

impl ReadingId {
    /// Creates a new ReadingId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Reading ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the reading ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ReadingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReadingId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ReadingId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Message identifier newtype wrapper
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    /// Creates a new MessageId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Message ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the message ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for MessageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
