//! Active-alert derivation from a reading and its thresholds.
//!
//! Alerts are evaluated in a fixed order so the list is stable across
//! recomputations: moisture high, moisture low, temperature high,
//! temperature low, ammonia high. Ammonia has no low-side alert; low
//! ammonia is not an operational concern for a compost pile.
//!
//! A check only fires when both the metric value and the relevant bound
//! are present; absent data suppresses the check silently.

use core::fmt;

use sprout_types::{Metric, Reading, ThresholdSet};

/// Sentinel entry returned when no alert is active.
///
/// Consumers always receive at least one line; distinguishing "no
/// alerts" from "not yet loaded" is the calling context's concern.
pub const NO_ACTIVE_ALERTS: &str = "No active alerts";

/// An active threshold violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alert {
    MoistureHigh,
    MoistureLow,
    TemperatureHigh,
    TemperatureLow,
    AmmoniaHigh,
}

impl Alert {
    /// The metric this alert refers to.
    pub fn metric(&self) -> Metric {
        match self {
            Alert::MoistureHigh | Alert::MoistureLow => Metric::Moisture,
            Alert::TemperatureHigh | Alert::TemperatureLow => Metric::Temperature,
            Alert::AmmoniaHigh => Metric::Ammonia,
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alert::MoistureHigh => write!(f, "Moisture above thresholds"),
            Alert::MoistureLow => write!(f, "Moisture below thresholds"),
            Alert::TemperatureHigh => write!(f, "Temperature above thresholds"),
            Alert::TemperatureLow => write!(f, "Temperature below thresholds"),
            Alert::AmmoniaHigh => write!(f, "Ammonia above thresholds"),
        }
    }
}

fn above(value: Option<f64>, bound: Option<f64>) -> bool {
    matches!((value, bound), (Some(v), Some(b)) if v > b)
}

fn below(value: Option<f64>, bound: Option<f64>) -> bool {
    matches!((value, bound), (Some(v), Some(b)) if v < b)
}

/// Derive the active alerts for a reading, in fixed evaluation order.
pub fn derive_alerts(reading: &Reading, thresholds: &ThresholdSet) -> Vec<Alert> {
    let checks = [
        (
            Alert::MoistureHigh,
            above(reading.moisture_percent, thresholds.moisture.max),
        ),
        (
            Alert::MoistureLow,
            below(reading.moisture_percent, thresholds.moisture.min),
        ),
        (
            Alert::TemperatureHigh,
            above(reading.temperature_c, thresholds.temperature.max),
        ),
        (
            Alert::TemperatureLow,
            below(reading.temperature_c, thresholds.temperature.min),
        ),
        (
            Alert::AmmoniaHigh,
            above(reading.ammonia_ppm, thresholds.ammonia.max),
        ),
    ];

    checks
        .into_iter()
        .filter_map(|(alert, fired)| fired.then_some(alert))
        .collect()
}

/// Consumer-facing alert lines.
///
/// Guaranteed non-empty: when nothing fires the list contains exactly
/// the [`NO_ACTIVE_ALERTS`] sentinel.
pub fn alert_lines(reading: &Reading, thresholds: &ThresholdSet) -> Vec<String> {
    let alerts = derive_alerts(reading, thresholds);
    if alerts.is_empty() {
        vec![NO_ACTIVE_ALERTS.to_string()]
    } else {
        alerts.iter().map(ToString::to_string).collect()
    }
}
