//! Patient/doctor messaging thread
//!
//! Minimal read/unread state transitions over the message store. Messages
//! are append-only; the only mutation is the recipient marking a message
//! read. Display order is `timestamp` ascending.

use crate::adapters::store::{Filter, ResourceStore};
use crate::core::auth::Clock;
use crate::domain::{
    DoctorId, GlucotelError, Message, MessageId, PatientId, Result, SenderRole, StoreError,
};
use serde_json::json;
use std::sync::Arc;

/// Resource name for message records
const MESSAGES: &str = "patientDoctorMessages";

/// Messaging service for one patient/doctor thread
pub struct MessagingService {
    store: Arc<dyn ResourceStore>,
    clock: Arc<dyn Clock>,
}

impl MessagingService {
    /// Create a messaging service
    pub fn new(store: Arc<dyn ResourceStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Append a message to a thread
    ///
    /// The message starts unread; `senderId` is derived from the sending
    /// side of the thread.
    pub async fn send(
        &self,
        patient_id: &PatientId,
        doctor_id: &DoctorId,
        sender: SenderRole,
        content: &str,
    ) -> Result<Message> {
        if content.trim().is_empty() {
            return Err(GlucotelError::Messaging(
                "Message content cannot be empty".to_string(),
            ));
        }

        let sender_id = match sender {
            SenderRole::Patient => patient_id.as_str(),
            SenderRole::Doctor => doctor_id.as_str(),
        };

        let body = json!({
            "patientId": patient_id.as_str(),
            "doctorId": doctor_id.as_str(),
            "senderId": sender_id,
            "senderType": sender,
            "content": content,
            "timestamp": self.clock.now(),
            "read": false,
        });

        let created = self.store.create(MESSAGES, body).await?;
        parse_message(created)
    }

    /// The full thread between a patient and a doctor, oldest first
    pub async fn thread(
        &self,
        patient_id: &PatientId,
        doctor_id: &DoctorId,
    ) -> Result<Vec<Message>> {
        let filter = Filter::new()
            .eq("patientId", json!(patient_id.as_str()))
            .eq("doctorId", json!(doctor_id.as_str()));
        let entities = self.store.list(MESSAGES, &filter).await?;

        let mut messages = Vec::with_capacity(entities.len());
        for entity in entities {
            messages.push(parse_message(entity)?);
        }
        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }

    /// Mark a message read from the recipient's side
    ///
    /// Only the non-sending party may mark a message read. Marking an
    /// already-read message is a no-op that returns the message unchanged.
    ///
    /// # Errors
    ///
    /// Returns a messaging error when the reader authored the message.
    pub async fn mark_read(&self, message_id: &MessageId, reader: SenderRole) -> Result<Message> {
        let message = parse_message(self.store.get(MESSAGES, message_id.as_str()).await?)?;

        if message.sender_type == reader {
            return Err(GlucotelError::Messaging(
                "A sender cannot mark their own message as read".to_string(),
            ));
        }

        if message.read {
            return Ok(message);
        }

        let patched = self
            .store
            .patch(
                MESSAGES,
                message_id.as_str(),
                json!({"read": true, "readAt": self.clock.now()}),
            )
            .await?;
        parse_message(patched)
    }

    /// Count of unread messages addressed to one side of the thread
    pub async fn unread_count(
        &self,
        patient_id: &PatientId,
        doctor_id: &DoctorId,
        for_role: SenderRole,
    ) -> Result<usize> {
        let filter = Filter::new()
            .eq("patientId", json!(patient_id.as_str()))
            .eq("doctorId", json!(doctor_id.as_str()))
            .eq("read", json!(false));
        let unread = self.store.list(MESSAGES, &filter).await?;

        let role_name = for_role.to_string();
        Ok(unread
            .iter()
            .filter(|entity| {
                entity.get("senderType").and_then(|s| s.as_str()) != Some(role_name.as_str())
            })
            .count())
    }
}

/// Parse a message entity at the store boundary
fn parse_message(value: serde_json::Value) -> Result<Message> {
    serde_json::from_value(value)
        .map_err(|e| StoreError::InvalidResponse(format!("Malformed message record: {e}")).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::MemoryStore;
    use crate::core::auth::ManualClock;
    use chrono::Duration;

    fn service() -> (MessagingService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_now());
        let service = MessagingService::new(Arc::new(MemoryStore::new()), clock.clone());
        (service, clock)
    }

    fn ids() -> (PatientId, DoctorId) {
        (
            PatientId::new("patient-1").unwrap(),
            DoctorId::new("dr-1").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_send_appends_unread() {
        let (service, _) = service();
        let (patient, doctor) = ids();

        let message = service
            .send(&patient, &doctor, SenderRole::Patient, "Bonjour docteur")
            .await
            .unwrap();

        assert!(!message.read);
        assert!(message.read_at.is_none());
        assert_eq!(message.sender_id, "patient-1");
    }

    #[tokio::test]
    async fn test_send_rejects_empty_content() {
        let (service, _) = service();
        let (patient, doctor) = ids();

        let result = service.send(&patient, &doctor, SenderRole::Patient, "   ").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_thread_orders_by_timestamp() {
        let (service, clock) = service();
        let (patient, doctor) = ids();

        let first = service
            .send(&patient, &doctor, SenderRole::Patient, "premier")
            .await
            .unwrap();
        clock.advance(Duration::seconds(10));
        let second = service
            .send(&patient, &doctor, SenderRole::Doctor, "deuxième")
            .await
            .unwrap();

        let thread = service.thread(&patient, &doctor).await.unwrap();
        assert_eq!(thread.len(), 2);
        assert_eq!(thread[0].id, first.id);
        assert_eq!(thread[1].id, second.id);
    }

    #[tokio::test]
    async fn test_recipient_marks_read() {
        let (service, _) = service();
        let (patient, doctor) = ids();

        let message = service
            .send(&patient, &doctor, SenderRole::Patient, "Bonjour")
            .await
            .unwrap();

        let read = service
            .mark_read(&message.id, SenderRole::Doctor)
            .await
            .unwrap();
        assert!(read.read);
        assert!(read.read_at.is_some());
    }

    #[tokio::test]
    async fn test_sender_cannot_mark_own_message() {
        let (service, _) = service();
        let (patient, doctor) = ids();

        let message = service
            .send(&patient, &doctor, SenderRole::Patient, "Bonjour")
            .await
            .unwrap();

        let result = service.mark_read(&message.id, SenderRole::Patient).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_mark_read_is_idempotent() {
        let (service, _) = service();
        let (patient, doctor) = ids();

        let message = service
            .send(&patient, &doctor, SenderRole::Patient, "Bonjour")
            .await
            .unwrap();

        let first = service
            .mark_read(&message.id, SenderRole::Doctor)
            .await
            .unwrap();
        let second = service
            .mark_read(&message.id, SenderRole::Doctor)
            .await
            .unwrap();
        assert_eq!(first.read_at, second.read_at);
    }

    #[tokio::test]
    async fn test_unread_count_per_role() {
        let (service, _) = service();
        let (patient, doctor) = ids();

        service
            .send(&patient, &doctor, SenderRole::Patient, "un")
            .await
            .unwrap();
        service
            .send(&patient, &doctor, SenderRole::Patient, "deux")
            .await
            .unwrap();
        service
            .send(&patient, &doctor, SenderRole::Doctor, "réponse")
            .await
            .unwrap();

        // Two patient messages await the doctor; one doctor message awaits
        // the patient
        assert_eq!(
            service
                .unread_count(&patient, &doctor, SenderRole::Doctor)
                .await
                .unwrap(),
            2
        );
        assert_eq!(
            service
                .unread_count(&patient, &doctor, SenderRole::Patient)
                .await
                .unwrap(),
            1
        );
    }
}
