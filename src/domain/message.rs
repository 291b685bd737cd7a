//! Patient/doctor message domain model
//!
//! Messages are append-only; `read`/`readAt` are the only mutable fields and
//! may only be set from the recipient's side.

use super::ids::{DoctorId, MessageId, PatientId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the exchange authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderRole {
    /// Authored by the patient
    Patient,
    /// Authored by the doctor
    Doctor,
}

impl SenderRole {
    /// The opposite side of the exchange
    pub fn recipient(&self) -> SenderRole {
        match self {
            SenderRole::Patient => SenderRole::Doctor,
            SenderRole::Doctor => SenderRole::Patient,
        }
    }
}

impl fmt::Display for SenderRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SenderRole::Patient => write!(f, "patient"),
            SenderRole::Doctor => write!(f, "doctor"),
        }
    }
}

/// A secured message exchanged between a patient and their doctor
///
/// Field names follow the external store contract (`patientId`, `doctorId`,
/// `senderId`, `senderType`, `readAt`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique identifier for this message
    pub id: MessageId,

    /// Patient side of the thread
    pub patient_id: PatientId,

    /// Doctor side of the thread
    pub doctor_id: DoctorId,

    /// Identifier of the author (patient or doctor ID, per `sender_type`)
    pub sender_id: String,

    /// Which side authored the message
    pub sender_type: SenderRole,

    /// Message body
    pub content: String,

    /// When the message was sent
    pub timestamp: DateTime<Utc>,

    /// Whether the recipient has read the message
    pub read: bool,

    /// When the recipient read the message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_role_recipient() {
        assert_eq!(SenderRole::Patient.recipient(), SenderRole::Doctor);
        assert_eq!(SenderRole::Doctor.recipient(), SenderRole::Patient);
    }

    #[test]
    fn test_message_wire_field_names() {
        let message = Message {
            id: MessageId::new("msg-1").unwrap(),
            patient_id: PatientId::new("patient-1").unwrap(),
            doctor_id: DoctorId::new("dr-1").unwrap(),
            sender_id: "patient-1".to_string(),
            sender_type: SenderRole::Patient,
            content: "Ma glycémie de ce matin est normale".to_string(),
            timestamp: Utc::now(),
            read: false,
            read_at: None,
        };

        let json = serde_json::to_value(&message).unwrap();
        assert!(json.get("senderId").is_some());
        assert_eq!(json["senderType"], "patient");
        assert_eq!(json["read"], false);
        assert!(json.get("readAt").is_none());
    }
}
