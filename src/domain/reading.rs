//! Glycemia reading domain model
//!
//! This module defines the core Reading type representing a single glycemia
//! measurement logged by a patient, along with its meal context and the
//! clinical status assigned by classification.
//!
//! A reading is immutable once classified: `status` is a pure function of
//! `(value, momentOfDay, thresholds)` and must never be stored inconsistently
//! with its inputs.

use super::ids::{PatientId, ReadingId};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Meal context of a glycemia measurement
///
/// The moment of day selects which threshold table applies during
/// classification: measurements taken after a meal are postprandial, all
/// others are fasting/pre-meal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MomentOfDay {
    /// First measurement of the day, before any meal
    Fasting,
    /// After breakfast (postprandial)
    AfterBreakfast,
    /// Before lunch (pre-meal)
    BeforeLunch,
    /// After lunch (postprandial)
    AfterLunch,
    /// Before dinner (pre-meal)
    BeforeDinner,
    /// After dinner (postprandial)
    AfterDinner,
    /// Last measurement of the day
    Bedtime,
}

impl MomentOfDay {
    /// Whether this moment denotes a measurement taken after a meal
    ///
    /// Postprandial readings are judged against the post-meal threshold
    /// table; everything else uses the fasting/pre-meal table.
    pub fn is_postprandial(&self) -> bool {
        matches!(
            self,
            MomentOfDay::AfterBreakfast | MomentOfDay::AfterLunch | MomentOfDay::AfterDinner
        )
    }

    /// All moments in chronological order
    pub fn all() -> [MomentOfDay; 7] {
        [
            MomentOfDay::Fasting,
            MomentOfDay::AfterBreakfast,
            MomentOfDay::BeforeLunch,
            MomentOfDay::AfterLunch,
            MomentOfDay::BeforeDinner,
            MomentOfDay::AfterDinner,
            MomentOfDay::Bedtime,
        ]
    }
}

impl fmt::Display for MomentOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MomentOfDay::Fasting => "fasting",
            MomentOfDay::AfterBreakfast => "after_breakfast",
            MomentOfDay::BeforeLunch => "before_lunch",
            MomentOfDay::AfterLunch => "after_lunch",
            MomentOfDay::BeforeDinner => "before_dinner",
            MomentOfDay::AfterDinner => "after_dinner",
            MomentOfDay::Bedtime => "bedtime",
        };
        write!(f, "{name}")
    }
}

/// Clinical status of a classified glycemia reading
///
/// Ordered by severity: `Hypo < Normal < Warning < High` would be misleading
/// since hypoglycemia is its own emergency, so the ordering here is only the
/// tiering used by the risk engine (`severity_rank`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlycemiaStatus {
    /// Below the hypoglycemia floor, regardless of meal timing
    Hypo,
    /// Within the target range
    Normal,
    /// Above target but below the alert threshold
    Warning,
    /// Above the alert threshold
    High,
}

impl GlycemiaStatus {
    /// Rank used for monotonicity checks over the upper-bound tiers
    ///
    /// `Hypo` sits outside the upper-bound ladder; it always dominates
    /// below the floor.
    pub fn severity_rank(&self) -> u8 {
        match self {
            GlycemiaStatus::Hypo => 0,
            GlycemiaStatus::Normal => 1,
            GlycemiaStatus::Warning => 2,
            GlycemiaStatus::High => 3,
        }
    }
}

impl fmt::Display for GlycemiaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GlycemiaStatus::Hypo => "hypo",
            GlycemiaStatus::Normal => "normal",
            GlycemiaStatus::Warning => "warning",
            GlycemiaStatus::High => "high",
        };
        write!(f, "{name}")
    }
}

/// A single glycemia measurement logged by a patient
///
/// Field names follow the external store contract (`patientId`,
/// `momentOfDay`); readings are append-only and never mutated after
/// classification.
///
/// # Examples
///
/// ```
/// use glucotel::domain::reading::{ReadingBuilder, MomentOfDay, GlycemiaStatus};
/// use glucotel::domain::ids::{PatientId, ReadingId};
/// use rust_decimal_macros::dec;
/// use chrono::{NaiveDate, NaiveTime};
///
/// let reading = ReadingBuilder::new()
///     .id(ReadingId::new("reading-1").unwrap())
///     .patient_id(PatientId::new("patient-1").unwrap())
///     .value(dec!(0.92))
///     .moment_of_day(MomentOfDay::Fasting)
///     .date(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap())
///     .time(NaiveTime::from_hms_opt(7, 30, 0).unwrap())
///     .status(GlycemiaStatus::Normal)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    /// Unique identifier for this reading
    pub id: ReadingId,

    /// Patient this reading belongs to
    pub patient_id: PatientId,

    /// Measured glycemia in g/L
    pub value: Decimal,

    /// Meal context of the measurement
    pub moment_of_day: MomentOfDay,

    /// Calendar day of the measurement
    pub date: NaiveDate,

    /// Wall-clock time of the measurement
    pub time: NaiveTime,

    /// Clinical status assigned at classification time
    pub status: GlycemiaStatus,
}

impl Reading {
    /// Creates a new builder for constructing a Reading
    pub fn builder() -> ReadingBuilder {
        ReadingBuilder::default()
    }
}

/// Builder for constructing Reading instances
#[derive(Debug, Default)]
pub struct ReadingBuilder {
    id: Option<ReadingId>,
    patient_id: Option<PatientId>,
    value: Option<Decimal>,
    moment_of_day: Option<MomentOfDay>,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
    status: Option<GlycemiaStatus>,
}

impl ReadingBuilder {
    /// Creates a new ReadingBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the reading ID
    pub fn id(mut self, id: ReadingId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the patient ID
    pub fn patient_id(mut self, patient_id: PatientId) -> Self {
        self.patient_id = Some(patient_id);
        self
    }

    /// Sets the measured value
    pub fn value(mut self, value: Decimal) -> Self {
        self.value = Some(value);
        self
    }

    /// Sets the meal context
    pub fn moment_of_day(mut self, moment: MomentOfDay) -> Self {
        self.moment_of_day = Some(moment);
        self
    }

    /// Sets the measurement date
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Sets the measurement time
    pub fn time(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Sets the classified status
    pub fn status(mut self, status: GlycemiaStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Builds the Reading
    ///
    /// # Errors
    ///
    /// Returns an error if any required field is missing or if the value
    /// is not a positive decimal.
    pub fn build(self) -> Result<Reading, String> {
        let value = self.value.ok_or("value is required")?;
        if value <= Decimal::ZERO {
            return Err(format!("value must be a positive decimal, got {value}"));
        }

        Ok(Reading {
            id: self.id.ok_or("id is required")?,
            patient_id: self.patient_id.ok_or("patient_id is required")?,
            value,
            moment_of_day: self.moment_of_day.ok_or("moment_of_day is required")?,
            date: self.date.ok_or("date is required")?,
            time: self.time.ok_or("time is required")?,
            status: self.status.ok_or("status is required")?,
        })
    }
}
