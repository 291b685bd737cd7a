//! Patient risk tiering
//!
//! Derives a patient's overall alert tier from their classified reading set.
//! The derivation is recomputed fresh from the full set on every evaluation,
//! so it is deterministic and idempotent; it never updates incrementally.

use crate::domain::reading::{GlycemiaStatus, Reading};
use serde::Serialize;
use std::fmt;

/// Overall alert tier for a patient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    /// Readings within expectations
    Ok,
    /// Needs watching
    Warning,
    /// Needs contact now
    Urgent,
}

impl RiskTier {
    /// Sort priority: higher tiers first in list views
    pub fn priority(&self) -> u8 {
        match self {
            RiskTier::Urgent => 3,
            RiskTier::Warning => 2,
            RiskTier::Ok => 1,
        }
    }

    /// Dashboard label for this tier
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Urgent => "Contacter",
            RiskTier::Warning => "À surveiller",
            RiskTier::Ok => "OK",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A derived tier with its dashboard label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    /// Derived alert tier
    pub tier: RiskTier,
    /// Dashboard label ("OK", "À surveiller", "Contacter")
    pub label: String,
}

/// Derive a patient's alert tier from their current reading set
///
/// Priority order:
/// 1. Two or more `high` readings is `Urgent`.
/// 2. One `high`, or more than two `warning` readings, is `Warning`.
/// 3. Everything else is `Ok`.
///
/// # Examples
///
/// ```
/// use glucotel::core::risk::{derive_status, RiskTier};
///
/// let assessment = derive_status(&[]);
/// assert_eq!(assessment.tier, RiskTier::Ok);
/// assert_eq!(assessment.label, "OK");
/// ```
pub fn derive_status(readings: &[Reading]) -> RiskAssessment {
    let high_count = readings
        .iter()
        .filter(|r| r.status == GlycemiaStatus::High)
        .count();
    let warning_count = readings
        .iter()
        .filter(|r| r.status == GlycemiaStatus::Warning)
        .count();

    let tier = if high_count >= 2 {
        RiskTier::Urgent
    } else if high_count >= 1 || warning_count > 2 {
        RiskTier::Warning
    } else {
        RiskTier::Ok
    };

    RiskAssessment {
        tier,
        label: tier.label().to_string(),
    }
}

/// Order items by descending tier priority, stable on ties
///
/// Stability preserves the caller's original order within a tier, which is
/// the contract list views rely on.
pub fn sort_by_tier_desc<T, F>(items: &mut [T], tier_of: F)
where
    F: Fn(&T) -> RiskTier,
{
    items.sort_by_key(|item| std::cmp::Reverse(tier_of(item).priority()));
}
