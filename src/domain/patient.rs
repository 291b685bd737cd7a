//! Patient domain model
//!
//! This module defines the Patient type owned by the monitoring domain.
//! Aggregate fields (`complianceRate`, `alertCount`) are mutated only through
//! aggregate recomputation, never directly by callers.

use super::ids::{DoctorId, PatientId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monitoring intensity assigned to a patient
///
/// Determines the expected number of readings per day (and per week):
/// classique = 4/day, lean = 2/day, strict = 6/day. The weekly expectations
/// derived from this table live in configuration and are overridable per
/// deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitoringMode {
    /// Standard follow-up, 4 readings per day
    Classique,
    /// Reduced follow-up, 2 readings per day
    Lean,
    /// Intensified follow-up, 6 readings per day
    Strict,
}

impl MonitoringMode {
    /// Expected readings per day for this mode
    pub fn expected_per_day(&self) -> u32 {
        match self {
            MonitoringMode::Classique => 4,
            MonitoringMode::Lean => 2,
            MonitoringMode::Strict => 6,
        }
    }
}

impl Default for MonitoringMode {
    fn default() -> Self {
        Self::Classique
    }
}

impl fmt::Display for MonitoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MonitoringMode::Classique => "classique",
            MonitoringMode::Lean => "lean",
            MonitoringMode::Strict => "strict",
        };
        write!(f, "{name}")
    }
}

/// Inclusive bounds of a glycemia target range, in g/L
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeBounds {
    /// Lower bound of the target range
    pub min: Decimal,
    /// Upper bound of the target range
    pub max: Decimal,
}

/// Per-patient glycemia target ranges
///
/// When present, a patient's own ranges override the deployment-wide
/// classification thresholds; the tiering logic itself never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetRange {
    /// Target range for fasting and pre-meal measurements
    pub fasting: RangeBounds,
    /// Target range for post-meal measurements
    pub postprandial: RangeBounds,
}

/// A monitored patient account
///
/// Field names follow the external store contract (`targetRange`,
/// `monitoringMode`, `complianceRate`, `alertCount`, `doctorId`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Unique identifier for this patient
    pub id: PatientId,

    /// Supervising doctor, set when a tracking code is redeemed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<DoctorId>,

    /// Per-patient target ranges, overriding deployment defaults when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_range: Option<TargetRange>,

    /// Monitoring intensity (expected readings per day)
    #[serde(default)]
    pub monitoring_mode: MonitoringMode,

    /// Adherence over the current window, 0..=100; recomputed, never
    /// hand-edited
    #[serde(default)]
    pub compliance_rate: u8,

    /// Number of out-of-range readings in the current window; recomputed
    #[serde(default)]
    pub alert_count: u32,
}

impl Patient {
    /// Creates a patient with default monitoring settings and no aggregates
    pub fn new(id: PatientId) -> Self {
        Self {
            id,
            doctor_id: None,
            target_range: None,
            monitoring_mode: MonitoringMode::default(),
            compliance_rate: 0,
            alert_count: 0,
        }
    }
}
