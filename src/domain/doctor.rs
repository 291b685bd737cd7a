//! Doctor domain model
//!
//! The MFA session lives directly on the doctor record: `mfaCode` and
//! `mfaExpiry` are the wire fields the store contract mandates. At most one
//! unconsumed session exists per doctor; issuing a new code overwrites the
//! prior one.

use super::ids::DoctorId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A supervising physician account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    /// Unique identifier for this doctor
    pub id: DoctorId,

    /// Login email
    pub email: String,

    /// SHA-256 hex digest of the password
    pub password_hash: String,

    /// Pending MFA code, absent when no challenge is outstanding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mfa_code: Option<String>,

    /// Expiry of the pending MFA code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mfa_expiry: Option<DateTime<Utc>>,
}

impl Doctor {
    /// Whether a challenge is currently stored, regardless of expiry
    pub fn has_pending_challenge(&self) -> bool {
        self.mfa_code.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doctor_wire_field_names() {
        let doctor = Doctor {
            id: DoctorId::new("dr-1").unwrap(),
            email: "dr@example.com".to_string(),
            password_hash: "ab".repeat(32),
            mfa_code: Some("482931".to_string()),
            mfa_expiry: Some(Utc::now()),
        };

        let json = serde_json::to_value(&doctor).unwrap();
        assert!(json.get("mfaCode").is_some());
        assert!(json.get("mfaExpiry").is_some());
        assert!(json.get("passwordHash").is_some());
    }

    #[test]
    fn test_doctor_without_challenge_omits_mfa_fields() {
        let doctor = Doctor {
            id: DoctorId::new("dr-1").unwrap(),
            email: "dr@example.com".to_string(),
            password_hash: "ab".repeat(32),
            mfa_code: None,
            mfa_expiry: None,
        };

        assert!(!doctor.has_pending_challenge());
        let json = serde_json::to_value(&doctor).unwrap();
        assert!(json.get("mfaCode").is_none());
        assert!(json.get("mfaExpiry").is_none());
    }
}
