//! Tracking-code generation and redemption
//!
//! A tracking code binds a new patient account to the doctor who issued it.
//! Generation guarantees the code is unique within the doctor's active-code
//! set; redemption consumes the code at most once via a conditional update,
//! so two concurrent redemption attempts can never both succeed.
//!
//! Tracking codes carry no expiry. That mirrors the observed product
//! behavior; see DESIGN.md for the recorded policy gap.

use crate::adapters::delivery::CodeDelivery;
use crate::adapters::store::{Filter, ResourceStore};
use crate::core::auth::Clock;
use crate::domain::tracking_code::{DeliveryChannel, TrackingCode};
use crate::domain::{DoctorId, LinkError, PatientId, Result, StoreError};
use rand::distributions::{Alphanumeric, DistString};
use serde_json::json;
use std::sync::Arc;

/// Resource name for tracking code records
const TRACKING_CODES: &str = "trackingCodes";

/// Length of a generated code
const CODE_LENGTH: usize = 8;

/// Attempts to find a collision-free code before giving up
const MAX_GENERATION_ATTEMPTS: usize = 16;

/// Tracking-code service
pub struct TrackingCodeLinker {
    store: Arc<dyn ResourceStore>,
    delivery: Arc<dyn CodeDelivery>,
    clock: Arc<dyn Clock>,
}

impl TrackingCodeLinker {
    /// Create a tracking-code service
    ///
    /// # Arguments
    ///
    /// * `store` - Resource store holding tracking-code records
    /// * `delivery` - Outbound code delivery collaborator
    /// * `clock` - Time source for `createdAt` stamps
    pub fn new(
        store: Arc<dyn ResourceStore>,
        delivery: Arc<dyn CodeDelivery>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            delivery,
            clock,
        }
    }

    /// Generate and deliver a new tracking code for a doctor
    ///
    /// The code is 8 uppercase alphanumeric characters, re-drawn until it
    /// does not collide with any of the doctor's active codes.
    ///
    /// # Arguments
    ///
    /// * `doctor_id` - Issuing doctor
    /// * `sent_to` - Recipient address
    /// * `sent_via` - Delivery channel (email or SMS)
    ///
    /// # Errors
    ///
    /// Returns a store error if persistence fails, or an error if no
    /// collision-free code could be drawn.
    pub async fn generate(
        &self,
        doctor_id: &DoctorId,
        sent_to: &str,
        sent_via: DeliveryChannel,
    ) -> Result<TrackingCode> {
        let active_filter = Filter::new()
            .eq("doctorId", json!(doctor_id.as_str()))
            .eq("isActive", json!(true));
        let active = self.store.list(TRACKING_CODES, &active_filter).await?;
        let active_codes: Vec<&str> = active
            .iter()
            .filter_map(|entity| entity.get("code").and_then(|c| c.as_str()))
            .collect();

        let code = draw_unique_code(&active_codes)?;

        let record = TrackingCode {
            id: uuid::Uuid::new_v4().to_string(),
            code: code.clone(),
            doctor_id: doctor_id.clone(),
            created_at: self.clock.now(),
            sent_to: sent_to.to_string(),
            sent_via,
            is_active: true,
            consumed_by_patient_id: None,
        };

        let created = self
            .store
            .create(TRACKING_CODES, serde_json::to_value(&record)?)
            .await?;
        let created: TrackingCode = serde_json::from_value(created).map_err(|e| {
            StoreError::InvalidResponse(format!("Malformed tracking code record: {e}"))
        })?;

        tracing::info!(
            doctor_id = %doctor_id,
            sent_via = %sent_via,
            "Tracking code generated"
        );

        let payload = format!("Votre code de suivi: {code}");
        self.delivery.send(sent_via, sent_to, &payload).await?;

        Ok(created)
    }

    /// Redeem a code for a patient signup
    ///
    /// On success the code is consumed atomically (`isActive` flips to
    /// false with the patient recorded) and the issuing doctor's ID is
    /// returned for the caller to persist on the patient record.
    ///
    /// # Errors
    ///
    /// - [`LinkError::NotFound`] when no record matches the code
    /// - [`LinkError::AlreadyConsumed`] when the code is inactive, or when
    ///   a concurrent redemption won the race
    pub async fn redeem(&self, code: &str, patient_id: &PatientId) -> Result<DoctorId> {
        let filter = Filter::new().eq("code", json!(code));
        let matches = self.store.list(TRACKING_CODES, &filter).await?;

        let Some(record) = matches.into_iter().next() else {
            return Err(LinkError::NotFound.into());
        };
        let record: TrackingCode = serde_json::from_value(record).map_err(|e| {
            StoreError::InvalidResponse(format!("Malformed tracking code record: {e}"))
        })?;

        if !record.is_active {
            return Err(LinkError::AlreadyConsumed.into());
        }

        // At-most-once: flip isActive only if it is still true. The loser
        // of a concurrent redemption sees the precondition fail.
        let consumed = self
            .store
            .patch_if(
                TRACKING_CODES,
                &record.id,
                json!({"isActive": true}),
                json!({
                    "isActive": false,
                    "consumedByPatientId": patient_id.as_str(),
                }),
            )
            .await?;

        if consumed.is_none() {
            tracing::warn!(code_id = %record.id, "Lost redemption race; code already consumed");
            return Err(LinkError::AlreadyConsumed.into());
        }

        tracing::info!(
            code_id = %record.id,
            doctor_id = %record.doctor_id,
            patient_id = %patient_id,
            "Tracking code redeemed"
        );

        Ok(record.doctor_id)
    }
}

/// Draw an uppercase alphanumeric code not present in `taken`
fn draw_unique_code(taken: &[&str]) -> Result<String> {
    for _ in 0..MAX_GENERATION_ATTEMPTS {
        let code = Alphanumeric
            .sample_string(&mut rand::thread_rng(), CODE_LENGTH)
            .to_uppercase();
        if !taken.contains(&code.as_str()) {
            return Ok(code);
        }
    }

    Err(crate::domain::GlucotelError::Other(
        "Could not generate a collision-free tracking code".to_string(),
    ))
}
