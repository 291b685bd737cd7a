//! Monitoring coordinator
//!
//! Orchestrates one full aggregation pass for a patient: fetch the reading
//! window, classify, aggregate into compliance and risk, and write the
//! recomputed aggregates back to the patient record. Patients and readings
//! are fetched concurrently, but nothing is classified until the full window
//! has arrived.
//!
//! Malformed stored readings are quarantined (skipped and logged), never
//! fatal: one corrupt record must not take down visibility into the rest.

use super::summary::PatientOverview;
use crate::adapters::store::{Filter, ResourceStore};
use crate::core::auth::Clock;
use crate::core::classify::{classify, effective_thresholds};
use crate::core::compliance::compute_compliance;
use crate::core::risk::{derive_status, sort_by_tier_desc};
use crate::config::{GlucotelConfig, MonitoringConfig, ThresholdsConfig};
use crate::domain::reading::{GlycemiaStatus, Reading};
use crate::domain::{Patient, PatientId, Result, StoreError};
use chrono::Duration;
use serde_json::json;
use std::sync::Arc;

/// Resource names used by the coordinator
const PATIENTS: &str = "patients";
const READINGS: &str = "glycemiaReadings";

/// Coordinates classification, aggregation, and aggregate persistence
pub struct MonitoringCoordinator {
    store: Arc<dyn ResourceStore>,
    clock: Arc<dyn Clock>,
    thresholds: ThresholdsConfig,
    monitoring: MonitoringConfig,
    dry_run: bool,
}

impl MonitoringCoordinator {
    /// Create a monitoring coordinator
    ///
    /// # Arguments
    ///
    /// * `store` - Resource store holding patients and readings
    /// * `clock` - Time source anchoring the aggregation window
    /// * `config` - Thresholds, window length, and dry-run flag
    pub fn new(
        store: Arc<dyn ResourceStore>,
        clock: Arc<dyn Clock>,
        config: &GlucotelConfig,
    ) -> Self {
        Self {
            store,
            clock,
            thresholds: config.thresholds,
            monitoring: config.monitoring,
            dry_run: config.application.dry_run,
        }
    }

    /// Compute the overview for one patient and persist the aggregates
    ///
    /// Fetches the patient record and their readings concurrently, then:
    /// 1. Quarantines malformed reading records.
    /// 2. Re-classifies every reading against the patient's effective
    ///    thresholds (a stored status inconsistent with its inputs never
    ///    survives into the aggregates).
    /// 3. Restricts to the configured window ending today.
    /// 4. Computes compliance and risk, and patches `complianceRate` /
    ///    `alertCount` onto the patient record (skipped in dry-run mode).
    ///
    /// # Errors
    ///
    /// Returns a store error if the patient cannot be fetched, is malformed,
    /// or the aggregate write fails.
    pub async fn patient_overview(&self, patient_id: &PatientId) -> Result<PatientOverview> {
        let readings_filter = Filter::new().eq("patientId", json!(patient_id.as_str()));
        let (patient_value, reading_values) = futures::future::try_join(
            self.store.get(PATIENTS, patient_id.as_str()),
            self.store.list(READINGS, &readings_filter),
        )
        .await?;

        let patient: Patient = serde_json::from_value(patient_value).map_err(|e| {
            StoreError::InvalidResponse(format!("Malformed patient record: {e}"))
        })?;

        let readings = self.classified_window(&patient, reading_values);

        let compliance =
            compute_compliance(&readings, patient.monitoring_mode, &self.monitoring);
        let risk = derive_status(&readings);
        let alert_count = readings
            .iter()
            .filter(|r| matches!(r.status, GlycemiaStatus::High | GlycemiaStatus::Hypo))
            .count() as u32;

        if self.dry_run {
            tracing::info!(patient_id = %patient_id, "Dry run: skipping aggregate write");
        } else {
            self.store
                .patch(
                    PATIENTS,
                    patient_id.as_str(),
                    json!({
                        "complianceRate": compliance.compliance_rate,
                        "alertCount": alert_count,
                    }),
                )
                .await?;
        }

        tracing::info!(
            patient_id = %patient_id,
            reading_count = readings.len(),
            compliance_rate = compliance.compliance_rate,
            tier = %risk.tier,
            "Patient overview computed"
        );

        Ok(PatientOverview {
            patient_id: patient.id,
            monitoring_mode: patient.monitoring_mode,
            window_days: self.monitoring.window_days,
            reading_count: readings.len(),
            alert_count,
            compliance,
            risk,
        })
    }

    /// Compute overviews for every patient, ordered by descending risk tier
    ///
    /// Patients whose overview fails (missing record, malformed data) are
    /// skipped with a logged error; the rest of the dashboard still renders.
    /// Ordering is stable: patients within a tier keep their store order.
    pub async fn overview_all(&self) -> Result<Vec<PatientOverview>> {
        let patients = self.store.list(PATIENTS, &Filter::new()).await?;

        let mut overviews = Vec::with_capacity(patients.len());
        for patient_value in patients {
            let Some(id) = patient_value.get("id").and_then(|v| v.as_str()) else {
                tracing::warn!("Skipping patient record without an id");
                continue;
            };
            let patient_id = match PatientId::new(id) {
                Ok(patient_id) => patient_id,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping patient with invalid id");
                    continue;
                }
            };

            match self.patient_overview(&patient_id).await {
                Ok(overview) => overviews.push(overview),
                Err(e) => {
                    tracing::error!(patient_id = %patient_id, error = %e, "Skipping patient overview");
                }
            }
        }

        sort_by_tier_desc(&mut overviews, |overview| overview.risk.tier);
        Ok(overviews)
    }

    /// Parse, re-classify, and window the raw reading entities
    fn classified_window(
        &self,
        patient: &Patient,
        reading_values: Vec<serde_json::Value>,
    ) -> Vec<Reading> {
        let thresholds = effective_thresholds(&self.thresholds, patient.target_range.as_ref());
        let today = self.clock.now().date_naive();
        let window_start = today - Duration::days(self.monitoring.window_days as i64 - 1);

        let mut readings = Vec::with_capacity(reading_values.len());
        for value in reading_values {
            let mut reading: Reading = match serde_json::from_value(value) {
                Ok(reading) => reading,
                Err(e) => {
                    tracing::warn!(
                        patient_id = %patient.id,
                        error = %e,
                        "Quarantining malformed reading record"
                    );
                    continue;
                }
            };

            if reading.date < window_start || reading.date > today {
                continue;
            }

            // The stored status must agree with its inputs; recompute and
            // prefer the derived value when the record disagrees
            let derived = classify(reading.value, reading.moment_of_day, &thresholds);
            if derived != reading.status {
                tracing::debug!(
                    reading_id = %reading.id,
                    stored = %reading.status,
                    derived = %derived,
                    "Stored status inconsistent with inputs; using derived status"
                );
                reading.status = derived;
            }

            readings.push(reading);
        }
        readings
    }
}
