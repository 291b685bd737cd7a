//! Adherence and trend aggregation
//!
//! Aggregates a patient's readings over the monitoring window into the
//! dashboard metrics: compliance rate (actual vs expected readings), weekly
//! average, and the trend between the first and last day of the window.
//!
//! Zero-denominator cases resolve to `0` by policy, never an error: an empty
//! window reports a flat, fully non-adherent week rather than failing the
//! dashboard.

use crate::config::MonitoringConfig;
use crate::domain::patient::MonitoringMode;
use crate::domain::reading::Reading;
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregated adherence and trend metrics over one window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    /// Ratio of actual to expected readings, capped at 100
    pub compliance_rate: u8,

    /// Mean glycemia over the window, rounded to 2 decimals; 0 when empty
    pub weekly_average: Decimal,

    /// Percentage change between the first and last day's daily average;
    /// 0 with fewer than 2 days of data
    pub trend_pct: Decimal,
}

impl ComplianceReport {
    /// The all-zero report for an empty window
    pub fn empty() -> Self {
        Self {
            compliance_rate: 0,
            weekly_average: Decimal::ZERO,
            trend_pct: Decimal::ZERO,
        }
    }
}

/// Expected readings per week for a monitoring mode
///
/// The table is configuration (`[monitoring]`), defaulting to the 4/2/6
/// readings-per-day model: classique=28, lean=14, strict=42.
pub fn expected_per_week(mode: MonitoringMode, config: &MonitoringConfig) -> u32 {
    match mode {
        MonitoringMode::Classique => config.expected_classique,
        MonitoringMode::Lean => config.expected_lean,
        MonitoringMode::Strict => config.expected_strict,
    }
}

/// Compute adherence and trend metrics over a window of readings
///
/// # Arguments
///
/// * `readings` - The patient's readings within the window
/// * `mode` - The patient's monitoring mode
/// * `config` - Window length and expectation table
///
/// # Examples
///
/// ```
/// use glucotel::core::compliance::compute_compliance;
/// use glucotel::config::MonitoringConfig;
/// use glucotel::domain::patient::MonitoringMode;
///
/// let report = compute_compliance(&[], MonitoringMode::Classique, &MonitoringConfig::default());
/// assert_eq!(report.compliance_rate, 0);
/// ```
pub fn compute_compliance(
    readings: &[Reading],
    mode: MonitoringMode,
    config: &MonitoringConfig,
) -> ComplianceReport {
    if readings.is_empty() {
        return ComplianceReport::empty();
    }

    let expected = expected_per_week(mode, config);
    let actual = readings.len() as u32;

    let rate = if expected == 0 {
        0
    } else {
        let ratio = Decimal::from(actual * 100) / Decimal::from(expected);
        let rounded = ratio
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .unwrap_or(u32::MAX);
        rounded.min(100) as u8
    };

    let sum: Decimal = readings.iter().map(|r| r.value).sum();
    let weekly_average = (sum / Decimal::from(readings.len()))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    ComplianceReport {
        compliance_rate: rate,
        weekly_average,
        trend_pct: trend_pct(readings),
    }
}

/// Percentage change between the first and last day's daily average
///
/// Days with zero readings simply don't appear in the daily series; with
/// fewer than 2 distinct days the trend is flat (`0`), not an error.
fn trend_pct(readings: &[Reading]) -> Decimal {
    let daily = daily_averages(readings);
    if daily.len() < 2 {
        return Decimal::ZERO;
    }

    // BTreeMap iteration is date-ordered, so first/last are the window edges
    let first = daily.values().next().copied().unwrap_or_default();
    let last = daily.values().last().copied().unwrap_or_default();

    if first.is_zero() {
        return Decimal::ZERO;
    }

    ((last - first) / first * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Mean value per day, ordered by date
fn daily_averages(readings: &[Reading]) -> BTreeMap<NaiveDate, Decimal> {
    let mut per_day: BTreeMap<NaiveDate, Vec<Decimal>> = BTreeMap::new();
    for reading in readings {
        per_day.entry(reading.date).or_default().push(reading.value);
    }

    per_day
        .into_iter()
        .map(|(date, values)| {
            let sum: Decimal = values.iter().sum();
            (date, sum / Decimal::from(values.len()))
        })
        .collect()
}
