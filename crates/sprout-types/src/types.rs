//! Core types for Sprout telemetry data.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identity of a monitored metric.
///
/// Used wherever a message must name the metric it refers to
/// (alert text, threshold validation errors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Metric {
    /// Pile temperature in degrees Celsius.
    Temperature,
    /// Moisture content as a percentage.
    Moisture,
    /// Ammonia concentration in ppm.
    Ammonia,
}

impl Metric {
    /// All metrics, in the order they appear on the dashboard card.
    pub const ALL: [Metric; 3] = [Metric::Temperature, Metric::Moisture, Metric::Ammonia];

    /// Display unit for this metric.
    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Temperature => "°C",
            Metric::Moisture => "%",
            Metric::Ammonia => "ppm",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Temperature => write!(f, "temperature"),
            Metric::Moisture => write!(f, "moisture"),
            Metric::Ammonia => write!(f, "ammonia"),
        }
    }
}

/// Classification of a metric value against its configured bounds.
///
/// # Ordering
///
/// Badges are ordered by severity: `Unknown < Normal < Low < High`.
/// This allows threshold comparisons like `if badge >= Badge::Low { warn!(...) }`.
///
/// # Display vs Serialization
///
/// `Display` returns the chip label shown on the dashboard ("Unknown",
/// "Low", "Normal", "High"), while serde serialization uses the variant
/// names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
#[repr(u8)]
pub enum Badge {
    /// Value or bounds missing; nothing can be claimed.
    Unknown = 0,
    /// Value within the configured bounds (inclusive).
    Normal = 1,
    /// Value below the configured minimum.
    Low = 2,
    /// Value above the configured maximum.
    High = 3,
}

impl Badge {
    /// Chip color tone used by the dashboard UI.
    pub fn tone(&self) -> Tone {
        match self {
            Badge::Unknown => Tone::Gray,
            Badge::Low => Tone::Blue,
            Badge::Normal => Tone::Green,
            Badge::High => Tone::Yellow,
        }
    }

    /// Whether this badge represents an out-of-bounds value.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Badge::Low | Badge::High)
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Badge::Unknown => write!(f, "Unknown"),
            Badge::Low => write!(f, "Low"),
            Badge::Normal => write!(f, "Normal"),
            Badge::High => write!(f, "High"),
        }
    }
}

/// Chip color tone for a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Tone {
    Gray,
    Blue,
    Green,
    Yellow,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tone::Gray => write!(f, "gray"),
            Tone::Blue => write!(f, "blue"),
            Tone::Green => write!(f, "green"),
            Tone::Yellow => write!(f, "yellow"),
        }
    }
}

/// One normalized sensor snapshot.
///
/// Every field the device may fail to report is optional; a `Reading`
/// with all optional fields empty is still a valid value. Readings are
/// immutable once produced: updates create a new `Reading`, they never
/// mutate one in place.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reading {
    /// Device-reported time in epoch seconds.
    ///
    /// May be absent, zero, or an uptime counter rather than wall-clock
    /// time; consumers must apply the epoch sanity floor before treating
    /// it as a date.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub timestamp: Option<i64>,
    /// Pile temperature in °C.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub temperature_c: Option<f64>,
    /// Moisture content in percent.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub moisture_percent: Option<f64>,
    /// Ammonia concentration in ppm.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub ammonia_ppm: Option<f64>,
    /// Reporting device identifier; empty when unreported.
    #[cfg_attr(feature = "serde", serde(default))]
    pub device_id: String,
    /// Free-form device status (e.g. "composting").
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub status: Option<String>,
    /// WiFi signal strength in dBm.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub signal_dbm: Option<f64>,
}

impl Reading {
    /// Metric value for the given metric.
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Temperature => self.temperature_c,
            Metric::Moisture => self.moisture_percent,
            Metric::Ammonia => self.ammonia_ppm,
        }
    }

    /// Timestamp used for history ordering: the reported time when
    /// present, otherwise 0 (sorts as oldest).
    pub fn sort_timestamp(&self) -> i64 {
        self.timestamp.unwrap_or(0)
    }

    /// True when no metric value and no timestamp was reported.
    pub fn is_empty(&self) -> bool {
        self.timestamp.is_none()
            && self.temperature_c.is_none()
            && self.moisture_percent.is_none()
            && self.ammonia_ppm.is_none()
    }
}

/// Operating bounds for a single metric.
///
/// Both bounds are optional so that malformed stored data still
/// normalizes to a displayable value; `min <= max` is only enforced when
/// a draft is saved, never when stored data is read back.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MetricBounds {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub min: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub max: Option<f64>,
}

impl MetricBounds {
    /// Bounds with both ends present.
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Whether both bounds are present.
    pub fn is_complete(&self) -> bool {
        self.min.is_some() && self.max.is_some()
    }
}

/// Configured alert thresholds for all three metrics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThresholdSet {
    pub temperature: MetricBounds,
    pub moisture: MetricBounds,
    pub ammonia: MetricBounds,
}

impl ThresholdSet {
    /// Stock bounds for an active composting pile: 45–60 °C,
    /// 65–75 % moisture, 0–15 ppm ammonia.
    pub fn recommended() -> Self {
        Self {
            temperature: MetricBounds::new(45.0, 60.0),
            moisture: MetricBounds::new(65.0, 75.0),
            ammonia: MetricBounds::new(0.0, 15.0),
        }
    }

    /// Bounds for the given metric.
    pub fn bounds(&self, metric: Metric) -> &MetricBounds {
        match metric {
            Metric::Temperature => &self.temperature,
            Metric::Moisture => &self.moisture,
            Metric::Ammonia => &self.ammonia,
        }
    }

    /// True when no bound is configured for any metric.
    pub fn is_empty(&self) -> bool {
        Metric::ALL
            .iter()
            .all(|m| self.bounds(*m).min.is_none() && self.bounds(*m).max.is_none())
    }
}

/// One history window entry: a normalized reading plus the opaque
/// upstream key it was stored under.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HistoryEntry {
    /// Opaque upstream key, used for identity and deduplication.
    pub key: String,
    pub reading: Reading,
}
