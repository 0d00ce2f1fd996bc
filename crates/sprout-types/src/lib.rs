//! Platform-agnostic types for the Sprout composting monitor.
//!
//! This crate provides the shared data shapes used by the engine
//! (sprout-core), the transport abstraction (sprout-store), and the
//! session layer (sprout-monitor).
//!
//! # Features
//!
//! - Canonical telemetry and threshold types
//! - Badge classification with severity ordering
//! - Draft validation error types
//!
//! # Example
//!
//! ```
//! use sprout_types::{Badge, Reading, ThresholdSet};
//!
//! let set = ThresholdSet::recommended();
//! assert_eq!(set.temperature.min, Some(45.0));
//! ```

pub mod error;
pub mod types;

pub use error::{DraftError, DraftResult};
pub use types::{Badge, HistoryEntry, Metric, MetricBounds, Reading, ThresholdSet, Tone};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_serde_round_trip() {
        let reading = Reading {
            timestamp: Some(1_761_000_000),
            temperature_c: Some(54.0),
            moisture_percent: Some(72.0),
            ammonia_ppm: Some(8.0),
            device_id: "ESP32".to_string(),
            status: Some("composting".to_string()),
            signal_dbm: Some(-61.0),
        };

        let json = serde_json::to_string(&reading).unwrap();
        let back: Reading = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reading);
    }

    #[test]
    fn test_reading_serialization_skips_absent_fields() {
        let reading = Reading::default();
        let json = serde_json::to_string(&reading).unwrap();
        assert!(!json.contains("temperature_c"));
        assert!(!json.contains("timestamp"));
    }

    #[test]
    fn test_threshold_set_serde_round_trip() {
        let set = ThresholdSet::recommended();
        let json = serde_json::to_string(&set).unwrap();
        let back: ThresholdSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_badge_serializes_as_variant_name() {
        let json = serde_json::to_string(&Badge::Normal).unwrap();
        assert_eq!(json, "\"Normal\"");
    }

    #[test]
    fn test_history_entry_carries_key() {
        let entry = HistoryEntry {
            key: "000000000001".to_string(),
            reading: Reading::default(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("000000000001"));
    }
}
