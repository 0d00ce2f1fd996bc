//! Threshold evaluation and draft validation.
//!
//! Classifies a metric value against its configured bounds into a
//! [`Badge`], and enforces the `min <= max` invariant on the write path.
//!
//! # Example
//!
//! ```
//! use sprout_core::thresholds::evaluate;
//! use sprout_types::Badge;
//!
//! assert_eq!(evaluate(Some(54.0), Some(45.0), Some(60.0)), Badge::Normal);
//! assert_eq!(evaluate(Some(62.0), Some(45.0), Some(60.0)), Badge::High);
//! assert_eq!(evaluate(None, Some(45.0), Some(60.0)), Badge::Unknown);
//! ```

use sprout_types::{Badge, DraftError, DraftResult, Metric, MetricBounds, Reading, ThresholdSet};

/// Badges for all three metrics of one reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricBadges {
    pub temperature: Badge,
    pub moisture: Badge,
    pub ammonia: Badge,
}

impl MetricBadges {
    /// Badge for the given metric.
    pub fn badge(&self, metric: Metric) -> Badge {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Moisture => self.moisture,
            Metric::Ammonia => self.ammonia,
        }
    }
}

/// Classify a value against its bounds.
///
/// `Unknown` when the value or either bound is absent; a missing bound
/// is never guessed. Bounds are inclusive: `value == min` and
/// `value == max` are both `Normal`.
pub fn evaluate(value: Option<f64>, min: Option<f64>, max: Option<f64>) -> Badge {
    let (Some(value), Some(min), Some(max)) = (value, min, max) else {
        return Badge::Unknown;
    };
    if value < min {
        Badge::Low
    } else if value > max {
        Badge::High
    } else {
        Badge::Normal
    }
}

/// Classify a value against a [`MetricBounds`].
pub fn evaluate_bounds(value: Option<f64>, bounds: &MetricBounds) -> Badge {
    evaluate(value, bounds.min, bounds.max)
}

/// Classify every metric of a reading independently.
pub fn evaluate_reading(reading: &Reading, thresholds: &ThresholdSet) -> MetricBadges {
    MetricBadges {
        temperature: evaluate_bounds(reading.temperature_c, &thresholds.temperature),
        moisture: evaluate_bounds(reading.moisture_percent, &thresholds.moisture),
        ammonia: evaluate_bounds(reading.ammonia_ppm, &thresholds.ammonia),
    }
}

/// Validate a threshold draft before it is written.
///
/// A draft is rejected when any group's bound is missing (non-numeric
/// input normalizes to missing) or when `min > max`. The error names the
/// offending group.
pub fn validate_draft(draft: &ThresholdSet) -> DraftResult<()> {
    for metric in Metric::ALL {
        let bounds = draft.bounds(metric);
        let (min, max) = match (bounds.min, bounds.max) {
            (Some(min), Some(max)) => (min, max),
            (None, _) => {
                return Err(DraftError::Incomplete {
                    metric,
                    detail: "min is missing or not a number",
                });
            }
            (_, None) => {
                return Err(DraftError::Incomplete {
                    metric,
                    detail: "max is missing or not a number",
                });
            }
        };
        if min > max {
            return Err(DraftError::Inverted { metric, min, max });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_tri_state() {
        let (min, max) = (Some(45.0), Some(60.0));
        assert_eq!(evaluate(Some(40.0), min, max), Badge::Low);
        assert_eq!(evaluate(Some(54.0), min, max), Badge::Normal);
        assert_eq!(evaluate(Some(62.0), min, max), Badge::High);
    }

    #[test]
    fn test_evaluate_boundaries_are_normal() {
        let (min, max) = (Some(45.0), Some(60.0));
        assert_eq!(evaluate(Some(45.0), min, max), Badge::Normal);
        assert_eq!(evaluate(Some(60.0), min, max), Badge::Normal);
    }

    #[test]
    fn test_evaluate_unknown_iff_any_absent() {
        assert_eq!(evaluate(None, Some(1.0), Some(2.0)), Badge::Unknown);
        assert_eq!(evaluate(Some(1.5), None, Some(2.0)), Badge::Unknown);
        assert_eq!(evaluate(Some(1.5), Some(1.0), None), Badge::Unknown);
        assert_eq!(evaluate(None, None, None), Badge::Unknown);
        // All present is never Unknown.
        assert_ne!(evaluate(Some(0.0), Some(1.0), Some(2.0)), Badge::Unknown);
    }

    #[test]
    fn test_evaluate_reading_is_per_metric() {
        let reading = Reading {
            temperature_c: Some(54.0),
            moisture_percent: Some(80.0),
            ammonia_ppm: None,
            ..Reading::default()
        };
        let badges = evaluate_reading(&reading, &ThresholdSet::recommended());
        assert_eq!(badges.temperature, Badge::Normal);
        assert_eq!(badges.moisture, Badge::High);
        assert_eq!(badges.ammonia, Badge::Unknown);
    }

    #[test]
    fn test_evaluate_reading_empty_thresholds() {
        let reading = Reading {
            temperature_c: Some(54.0),
            ..Reading::default()
        };
        let badges = evaluate_reading(&reading, &ThresholdSet::default());
        assert_eq!(badges.temperature, Badge::Unknown);
        assert_eq!(badges.badge(Metric::Moisture), Badge::Unknown);
    }

    #[test]
    fn test_validate_draft_accepts_recommended() {
        assert!(validate_draft(&ThresholdSet::recommended()).is_ok());
    }

    #[test]
    fn test_validate_draft_rejects_inverted_naming_group() {
        let mut draft = ThresholdSet::recommended();
        draft.temperature = MetricBounds::new(70.0, 50.0);

        let err = validate_draft(&draft).unwrap_err();
        assert_eq!(err.metric(), Metric::Temperature);
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn test_validate_draft_rejects_missing_bound() {
        let mut draft = ThresholdSet::recommended();
        draft.moisture.max = None;

        let err = validate_draft(&draft).unwrap_err();
        assert_eq!(err.metric(), Metric::Moisture);
        assert!(err.to_string().contains("moisture"));
    }

    #[test]
    fn test_validate_draft_accepts_equal_bounds() {
        let mut draft = ThresholdSet::recommended();
        draft.ammonia = MetricBounds::new(5.0, 5.0);
        assert!(validate_draft(&draft).is_ok());
    }
}
