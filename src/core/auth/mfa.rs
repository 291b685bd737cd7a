//! Doctor login and MFA challenge lifecycle
//!
//! The challenge is a keyed state machine per doctor: issuing writes
//! `mfaCode`/`mfaExpiry` onto the doctor record (overwriting any prior
//! challenge, which implicitly invalidates the old code), verification
//! consumes the code with a conditional update so it can succeed at most
//! once, and expiry is never auto-renewed — an expired code must be
//! explicitly re-issued.
//!
//! Code delivery is an external collaborator; this module only manages the
//! code lifecycle and hands the payload over.

use super::clock::Clock;
use crate::adapters::delivery::CodeDelivery;
use crate::adapters::store::{Filter, ResourceStore};
use crate::config::MfaConfig;
use crate::domain::tracking_code::DeliveryChannel;
use crate::domain::{AuthError, Doctor, DoctorId, Result, StoreError};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Resource name for doctor records
const DOCTORS: &str = "doctors";

/// A freshly issued challenge
///
/// The code is returned to the caller only so it can be embedded in the
/// delivery payload; it is never logged.
#[derive(Debug, Clone)]
pub struct IssuedChallenge {
    /// Doctor the challenge was issued for
    pub doctor_id: DoctorId,
    /// The 6-digit code
    pub code: String,
    /// Instant after which verification fails with `Expired`
    pub expires_at: DateTime<Utc>,
}

/// An authenticated doctor session, produced by successful verification
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    /// The authenticated doctor
    pub doctor_id: DoctorId,
    /// When verification succeeded
    pub authenticated_at: DateTime<Utc>,
}

/// SHA-256 hex digest of a password
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

/// MFA challenge service
///
/// Guards doctor login with a time-boxed one-time code. All state lives on
/// the doctor record in the store; this service holds no session state of
/// its own, so any number of instances behave identically.
pub struct MfaChallenge {
    store: Arc<dyn ResourceStore>,
    delivery: Arc<dyn CodeDelivery>,
    clock: Arc<dyn Clock>,
    policy: MfaConfig,
}

impl MfaChallenge {
    /// Create an MFA challenge service
    ///
    /// # Arguments
    ///
    /// * `store` - Resource store holding doctor records
    /// * `delivery` - Outbound code delivery collaborator
    /// * `clock` - Time source (injectable for tests)
    /// * `policy` - Code TTL and resend window
    pub fn new(
        store: Arc<dyn ResourceStore>,
        delivery: Arc<dyn CodeDelivery>,
        clock: Arc<dyn Clock>,
        policy: MfaConfig,
    ) -> Self {
        Self {
            store,
            delivery,
            clock,
            policy,
        }
    }

    /// Password step of doctor login
    ///
    /// On success a challenge is issued and delivered. Unknown email and
    /// wrong password both fail with [`AuthError::InvalidCredential`] — the
    /// caller cannot learn which check failed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredential` on any failed check, or a store error if
    /// the doctor lookup fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedChallenge> {
        let filter = Filter::new().eq("email", json!(email));
        let doctors = self.store.list(DOCTORS, &filter).await?;

        let Some(doctor) = doctors.into_iter().next() else {
            tracing::info!("Login attempt for unknown email");
            return Err(AuthError::InvalidCredential.into());
        };
        let doctor = parse_doctor(doctor)?;

        if doctor.password_hash != hash_password(password) {
            tracing::info!(doctor_id = %doctor.id, "Login attempt with wrong password");
            return Err(AuthError::InvalidCredential.into());
        }

        self.issue(&doctor.id).await
    }

    /// Issue a fresh challenge for a doctor
    ///
    /// Draws a uniform random 6-digit code, stamps its expiry, and
    /// overwrites any prior challenge on the record. The old code stops
    /// verifying the instant the new one is stored.
    ///
    /// # Errors
    ///
    /// Returns a store error if the doctor cannot be loaded or updated.
    pub async fn issue(&self, doctor_id: &DoctorId) -> Result<IssuedChallenge> {
        let doctor = parse_doctor(self.store.get(DOCTORS, doctor_id.as_str()).await?)?;

        let code = generate_code();
        let expires_at = self.clock.now() + Duration::seconds(self.policy.code_ttl_seconds as i64);

        self.store
            .patch(
                DOCTORS,
                doctor_id.as_str(),
                json!({
                    "mfaCode": code,
                    "mfaExpiry": expires_at,
                }),
            )
            .await?;

        tracing::info!(doctor_id = %doctor_id, expires_at = %expires_at, "MFA challenge issued");

        let payload = format!("Votre code de connexion: {code}");
        self.delivery
            .send(DeliveryChannel::Email, &doctor.email, &payload)
            .await?;

        Ok(IssuedChallenge {
            doctor_id: doctor_id.clone(),
            code,
            expires_at,
        })
    }

    /// Verify a submitted code
    ///
    /// State transitions:
    /// - past expiry: fails with `Expired` regardless of code correctness;
    ///   the challenge stays stored until re-issued
    /// - wrong code before expiry: fails with `InvalidCredential`, the
    ///   challenge stays valid and retries remain unlimited until expiry
    /// - correct code before expiry: clears the stored code atomically
    ///   (conditional update) and returns an authenticated session; the
    ///   code can never verify again
    ///
    /// # Errors
    ///
    /// `Expired`, `InvalidCredential`, or a store error.
    pub async fn verify(
        &self,
        doctor_id: &DoctorId,
        submitted_code: &str,
    ) -> Result<AuthenticatedSession> {
        let doctor = parse_doctor(self.store.get(DOCTORS, doctor_id.as_str()).await?)?;

        // A consumed or never-issued challenge verifies like a wrong code:
        // nothing about the record's state leaks
        let Some(code) = doctor.mfa_code else {
            tracing::info!(doctor_id = %doctor_id, "Verification with no stored challenge");
            return Err(AuthError::InvalidCredential.into());
        };
        let Some(expires_at) = doctor.mfa_expiry else {
            return Err(AuthError::InvalidCredential.into());
        };

        let now = self.clock.now();
        if now > expires_at {
            tracing::info!(doctor_id = %doctor_id, "Verification after expiry");
            return Err(AuthError::Expired.into());
        }

        if submitted_code != code {
            tracing::info!(doctor_id = %doctor_id, "Verification with wrong code");
            return Err(AuthError::InvalidCredential.into());
        }

        // One-time use: clear the code only if it is still the one we
        // checked. Losing this race means another verification consumed it
        // first, which must not produce a second success.
        let cleared = self
            .store
            .patch_if(
                DOCTORS,
                doctor_id.as_str(),
                json!({"mfaCode": code}),
                json!({"mfaCode": null, "mfaExpiry": null}),
            )
            .await?;

        if cleared.is_none() {
            tracing::warn!(doctor_id = %doctor_id, "Lost verification race; code already consumed");
            return Err(AuthError::InvalidCredential.into());
        }

        tracing::info!(doctor_id = %doctor_id, "MFA verification succeeded");
        Ok(AuthenticatedSession {
            doctor_id: doctor_id.clone(),
            authenticated_at: now,
        })
    }

    /// Re-issue a challenge, throttled to the final stretch of the window
    ///
    /// Resend is permitted only once the remaining TTL has dropped to the
    /// configured resend window (or the code has already expired). Earlier
    /// requests fail with `ResendThrottled` carrying the seconds left until
    /// resend becomes available.
    ///
    /// # Errors
    ///
    /// `ResendThrottled`, `NoPendingChallenge`, or a store error.
    pub async fn reissue(&self, doctor_id: &DoctorId) -> Result<IssuedChallenge> {
        let doctor = parse_doctor(self.store.get(DOCTORS, doctor_id.as_str()).await?)?;

        let Some(expires_at) = doctor.mfa_expiry.filter(|_| doctor.mfa_code.is_some()) else {
            return Err(AuthError::NoPendingChallenge.into());
        };

        let remaining = (expires_at - self.clock.now()).num_seconds();
        let window = self.policy.resend_window_seconds as i64;
        if remaining > window {
            return Err(AuthError::ResendThrottled {
                remaining_seconds: remaining - window,
            }
            .into());
        }

        self.issue(doctor_id).await
    }
}

/// Uniform random 6-digit code
fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

/// Parse a doctor entity at the store boundary
///
/// Malformed records are rejected here rather than propagating loose JSON
/// into the domain.
fn parse_doctor(value: serde_json::Value) -> Result<Doctor> {
    serde_json::from_value(value)
        .map_err(|e| StoreError::InvalidResponse(format!("Malformed doctor record: {e}")).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code_is_six_digits() {
        for _ in 0..1000 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            let numeric: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&numeric));
        }
    }

    #[test]
    fn test_hash_password_is_stable_hex() {
        let digest = hash_password("s3cret");
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, hash_password("s3cret"));
        assert_ne!(digest, hash_password("other"));
    }

    #[test]
    fn test_parse_doctor_rejects_malformed_record() {
        let malformed = json!({"id": "d-1"});
        assert!(parse_doctor(malformed).is_err());
    }

    #[test]
    fn test_parse_doctor_accepts_minimal_record() {
        let record = json!({
            "id": "d-1",
            "email": "dr@example.com",
            "passwordHash": hash_password("s3cret"),
        });
        let doctor = parse_doctor(record).unwrap();
        assert!(!doctor.has_pending_challenge());
    }
}
