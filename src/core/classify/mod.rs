//! Glycemia reading classification
//!
//! Pure classification of a measurement + meal context into a clinical
//! status. The threshold boundaries come from configuration
//! ([`ThresholdsConfig`]); a patient's own target range can override the
//! normal bounds through [`effective_thresholds`]. The tiering logic itself
//! never changes.
//!
//! Classification is total and deterministic over positive decimal input;
//! callers validate values at the store boundary before classifying.

use crate::config::ThresholdsConfig;
use crate::domain::patient::TargetRange;
use crate::domain::reading::{GlycemiaStatus, MomentOfDay};
use rust_decimal::Decimal;

/// Classify a glycemia value against the applicable threshold table
///
/// Rules, in priority order:
/// 1. `value < hypo` is `Hypo` — the floor dominates regardless of meal
///    timing.
/// 2. Postprandial moments use the post-meal bounds: `<= normal` is
///    `Normal`, `<= warning` is `Warning`, above is `High`.
/// 3. All other moments use the fasting/pre-meal bounds the same way.
///
/// # Arguments
///
/// * `value` - Measured glycemia in g/L (must be a positive decimal)
/// * `moment` - Meal context selecting the threshold table
/// * `thresholds` - Threshold boundaries to classify against
///
/// # Examples
///
/// ```
/// use glucotel::core::classify::classify;
/// use glucotel::config::ThresholdsConfig;
/// use glucotel::domain::reading::{GlycemiaStatus, MomentOfDay};
/// use rust_decimal_macros::dec;
///
/// let thresholds = ThresholdsConfig::default();
/// let status = classify(dec!(0.92), MomentOfDay::Fasting, &thresholds);
/// assert_eq!(status, GlycemiaStatus::Normal);
/// ```
pub fn classify(
    value: Decimal,
    moment: MomentOfDay,
    thresholds: &ThresholdsConfig,
) -> GlycemiaStatus {
    // Hypoglycemia always dominates, independent of meal timing
    if value < thresholds.hypo {
        return GlycemiaStatus::Hypo;
    }

    let (normal_max, warning_max) = if moment.is_postprandial() {
        (thresholds.post_meal_normal, thresholds.post_meal_warning)
    } else {
        (thresholds.fasting_normal, thresholds.fasting_warning)
    };

    if value <= normal_max {
        GlycemiaStatus::Normal
    } else if value <= warning_max {
        GlycemiaStatus::Warning
    } else {
        GlycemiaStatus::High
    }
}

/// Derive the thresholds that apply to one patient
///
/// A patient's `targetRange` overrides the normal bounds (`fasting.max`,
/// `postprandial.max`) and the hypo floor (`fasting.min`). The warning
/// bounds stay deployment-wide but are lifted to the overridden normal
/// bound when a wide target range would otherwise invert the ladder.
pub fn effective_thresholds(
    defaults: &ThresholdsConfig,
    target_range: Option<&TargetRange>,
) -> ThresholdsConfig {
    let Some(range) = target_range else {
        return *defaults;
    };

    let fasting_normal = range.fasting.max;
    let post_meal_normal = range.postprandial.max;

    ThresholdsConfig {
        hypo: range.fasting.min,
        fasting_normal,
        fasting_warning: defaults.fasting_warning.max(fasting_normal),
        post_meal_normal,
        post_meal_warning: defaults.post_meal_warning.max(post_meal_normal),
    }
}
