//! Tracking code domain model
//!
//! A tracking code is a one-time token a doctor issues to bind a new patient
//! account to that doctor. It transitions `isActive: true -> false` exactly
//! once, atomically with the patient linkage.

use super::ids::{DoctorId, PatientId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Delivery channel for a tracking code or MFA code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryChannel {
    /// Delivered by email
    Email,
    /// Delivered by SMS
    Sms,
}

impl fmt::Display for DeliveryChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryChannel::Email => write!(f, "email"),
            DeliveryChannel::Sms => write!(f, "sms"),
        }
    }
}

/// A one-time code binding a patient signup to a doctor
///
/// Field names follow the external store contract (`doctorId`, `createdAt`,
/// `sentTo`, `sentVia`, `isActive`, `consumedByPatientId`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingCode {
    /// Unique identifier for this record
    pub id: String,

    /// The code itself, as sent to the prospective patient
    pub code: String,

    /// Doctor the redeemed patient will be linked to
    pub doctor_id: DoctorId,

    /// When the code was generated
    pub created_at: DateTime<Utc>,

    /// Address the code was sent to
    pub sent_to: String,

    /// Channel the code was sent over
    pub sent_via: DeliveryChannel,

    /// Whether the code can still be redeemed
    pub is_active: bool,

    /// Patient that consumed the code, once redeemed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_by_patient_id: Option<PatientId>,
}
