//! Derived view models for the dashboard and history cards.
//!
//! These are pure recomputations over the current slot values (latest
//! reading, thresholds, history window). Nothing here is persisted;
//! the session recomputes a view whenever any contributing input
//! changes.

use serde::Serialize;
use time::OffsetDateTime;

use sprout_types::{Badge, HistoryEntry, Reading, ThresholdSet};

use crate::alerts::alert_lines;
use crate::thresholds::evaluate_reading;
use crate::timefmt::{UNKNOWN_TIME, resolve_display_time};

/// One metric tile on the dashboard card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricCard {
    /// Current value, when the device reported one.
    pub value: Option<f64>,
    /// Classification against the configured bounds.
    pub badge: Badge,
}

impl Default for MetricCard {
    fn default() -> Self {
        Self {
            value: None,
            badge: Badge::Unknown,
        }
    }
}

/// The dashboard card view model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// Resolved "last updated" time, or the unknown sentinel.
    pub updated_label: String,
    pub temperature: MetricCard,
    pub moisture: MetricCard,
    pub ammonia: MetricCard,
    /// Active alert lines; never empty (sentinel when quiet).
    pub alerts: Vec<String>,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self {
            updated_label: UNKNOWN_TIME.to_string(),
            temperature: MetricCard::default(),
            moisture: MetricCard::default(),
            ammonia: MetricCard::default(),
            alerts: vec![crate::alerts::NO_ACTIVE_ALERTS.to_string()],
        }
    }
}

/// One row of the data-logs card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    /// Resolved display time for this entry.
    pub display_time: String,
    pub temperature_c: Option<f64>,
    pub moisture_percent: Option<f64>,
    pub ammonia_ppm: Option<f64>,
}

/// Recompute the dashboard view from the current slots.
///
/// `received_at` is the local receipt time the session captured when
/// the latest snapshot arrived; it backs the "last updated" label when
/// the device-reported time is missing or implausible.
pub fn derive_dashboard(
    latest: Option<&Reading>,
    received_at: Option<OffsetDateTime>,
    thresholds: &ThresholdSet,
) -> DashboardView {
    let Some(reading) = latest else {
        return DashboardView::default();
    };

    let badges = evaluate_reading(reading, thresholds);
    DashboardView {
        updated_label: resolve_display_time(reading.timestamp, received_at),
        temperature: MetricCard {
            value: reading.temperature_c,
            badge: badges.temperature,
        },
        moisture: MetricCard {
            value: reading.moisture_percent,
            badge: badges.moisture,
        },
        ammonia: MetricCard {
            value: reading.ammonia_ppm,
            badge: badges.ammonia,
        },
        alerts: alert_lines(reading, thresholds),
    }
}

/// Project a reduced history window into display rows, preserving order.
pub fn history_rows(window: &[HistoryEntry]) -> Vec<HistoryRow> {
    window
        .iter()
        .map(|entry| HistoryRow {
            display_time: resolve_display_time(entry.reading.timestamp, None),
            temperature_c: entry.reading.temperature_c,
            moisture_percent: entry.reading.moisture_percent,
            ammonia_ppm: entry.reading.ammonia_ppm,
        })
        .collect()
}
