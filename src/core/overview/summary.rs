//! Patient overview summary types

use crate::core::compliance::ComplianceReport;
use crate::core::risk::RiskAssessment;
use crate::domain::ids::PatientId;
use crate::domain::patient::MonitoringMode;
use serde::Serialize;

/// Dashboard-ready aggregate for one patient
///
/// Produced by the monitoring coordinator from the patient's reading window;
/// the UI renders these directly.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientOverview {
    /// The patient this overview describes
    pub patient_id: PatientId,

    /// The patient's monitoring mode
    pub monitoring_mode: MonitoringMode,

    /// Length of the aggregation window in days
    pub window_days: u32,

    /// Readings found in the window (after quarantining malformed records)
    pub reading_count: usize,

    /// Readings classified high or hypo within the window
    pub alert_count: u32,

    /// Adherence and trend metrics
    pub compliance: ComplianceReport,

    /// Derived alert tier
    pub risk: RiskAssessment,
}
