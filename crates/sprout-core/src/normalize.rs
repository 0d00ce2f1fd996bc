//! Schema normalization for loosely-shaped telemetry records.
//!
//! Device firmware revisions have reported the same metrics under
//! several field names over time, and stored records may carry missing
//! or non-numeric values. Every inbound record passes through this
//! module before any other component sees it.
//!
//! Resolution is an ordered fallback chain per logical field: the first
//! present, non-null candidate wins. Values that fail numeric coercion
//! are treated as absent, never as errors. Upstream data quality
//! varies, and a partially-shaped record must still render.
//!
//! Both entry points are total: any input, including `null` and
//! non-object values, produces a fully-shaped (possibly all-empty)
//! result.

use serde_json::Value;

use sprout_types::{MetricBounds, Reading, ThresholdSet};

/// Candidate field names for the reported timestamp, in resolution order.
pub const TIMESTAMP_FIELDS: &[&str] = &["ts", "updatedAt", "timestamp"];
/// Candidate field names for temperature.
pub const TEMPERATURE_FIELDS: &[&str] = &["temperatureC", "temperature", "temp"];
/// Candidate field names for moisture.
pub const MOISTURE_FIELDS: &[&str] = &["moistureLevel", "moisturePercent", "moisture", "humidity"];
/// Candidate field names for ammonia.
pub const AMMONIA_FIELDS: &[&str] = &["nh3Ppm", "nh3", "ammoniaPpm", "ammonia"];
/// Candidate field names for the device identifier.
pub const DEVICE_ID_FIELDS: &[&str] = &["deviceId", "device"];
/// Candidate field names for the device status string.
pub const STATUS_FIELDS: &[&str] = &["status", "state"];
/// Candidate field names for WiFi signal strength.
pub const SIGNAL_FIELDS: &[&str] = &["rssi", "signalDbm", "wifi"];

/// Candidate group names for the temperature threshold group.
pub const TEMPERATURE_GROUPS: &[&str] = &["temperature", "temp"];
/// Candidate group names for the moisture threshold group.
///
/// `humidity` is the pre-rename key and is still found in older stored
/// threshold sets.
pub const MOISTURE_GROUPS: &[&str] = &["moistureLevel", "humidity"];
/// Candidate group names for the ammonia threshold group.
pub const AMMONIA_GROUPS: &[&str] = &["nh3", "ammonia"];

/// Resolve the first present, non-null candidate field.
fn first_present<'a>(raw: &'a Value, candidates: &[&str]) -> Option<&'a Value> {
    let map = raw.as_object()?;
    candidates
        .iter()
        .find_map(|name| map.get(*name).filter(|v| !v.is_null()))
}

/// Lenient numeric coercion.
///
/// JSON numbers pass through; strings are trimmed and parsed. Anything
/// else, and any non-finite result, resolves to `None` so NaN can never
/// escape into derived state.
fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn number_field(raw: &Value, candidates: &[&str]) -> Option<f64> {
    first_present(raw, candidates).and_then(coerce_number)
}

fn string_field(raw: &Value, candidates: &[&str]) -> Option<String> {
    first_present(raw, candidates).and_then(coerce_string)
}

/// Map a raw telemetry record onto the canonical [`Reading`] shape.
///
/// Total over all inputs; a record missing every known field yields a
/// `Reading` with every optional field empty.
pub fn normalize_reading(raw: &Value) -> Reading {
    Reading {
        timestamp: number_field(raw, TIMESTAMP_FIELDS).map(|n| n as i64),
        temperature_c: number_field(raw, TEMPERATURE_FIELDS),
        moisture_percent: number_field(raw, MOISTURE_FIELDS),
        ammonia_ppm: number_field(raw, AMMONIA_FIELDS),
        device_id: string_field(raw, DEVICE_ID_FIELDS).unwrap_or_default(),
        status: string_field(raw, STATUS_FIELDS),
        signal_dbm: number_field(raw, SIGNAL_FIELDS),
    }
}

fn normalize_bounds(raw: &Value, groups: &[&str]) -> MetricBounds {
    match first_present(raw, groups) {
        Some(group) => MetricBounds {
            min: number_field(group, &["min"]),
            max: number_field(group, &["max"]),
        },
        None => MetricBounds::default(),
    }
}

/// Map a raw threshold record onto the canonical [`ThresholdSet`] shape.
///
/// Malformed stored data normalizes to empty bounds rather than
/// erroring; the `min <= max` invariant is a write-time concern.
pub fn normalize_thresholds(raw: &Value) -> ThresholdSet {
    ThresholdSet {
        temperature: normalize_bounds(raw, TEMPERATURE_GROUPS),
        moisture: normalize_bounds(raw, MOISTURE_GROUPS),
        ammonia: normalize_bounds(raw, AMMONIA_GROUPS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_reading_canonical_fields() {
        let raw = json!({
            "ts": 1_761_000_000i64,
            "temperatureC": 54,
            "moistureLevel": 72,
            "nh3Ppm": 8,
            "deviceId": "ESP32",
            "status": "composting",
            "rssi": -61
        });

        let reading = normalize_reading(&raw);
        assert_eq!(reading.timestamp, Some(1_761_000_000));
        assert_eq!(reading.temperature_c, Some(54.0));
        assert_eq!(reading.moisture_percent, Some(72.0));
        assert_eq!(reading.ammonia_ppm, Some(8.0));
        assert_eq!(reading.device_id, "ESP32");
        assert_eq!(reading.status.as_deref(), Some("composting"));
        assert_eq!(reading.signal_dbm, Some(-61.0));
    }

    #[test]
    fn test_normalize_reading_legacy_field_names() {
        let raw = json!({
            "updatedAt": 1_761_000_100i64,
            "temp": 41.5,
            "humidity": 68,
            "ammonia": 3
        });

        let reading = normalize_reading(&raw);
        assert_eq!(reading.timestamp, Some(1_761_000_100));
        assert_eq!(reading.temperature_c, Some(41.5));
        assert_eq!(reading.moisture_percent, Some(68.0));
        assert_eq!(reading.ammonia_ppm, Some(3.0));
    }

    #[test]
    fn test_first_candidate_wins() {
        let raw = json!({ "ts": 100, "updatedAt": 200 });
        assert_eq!(normalize_reading(&raw).timestamp, Some(100));

        // A null first candidate falls through to the next one.
        let raw = json!({ "ts": null, "updatedAt": 200 });
        assert_eq!(normalize_reading(&raw).timestamp, Some(200));
    }

    #[test]
    fn test_normalize_reading_missing_everything() {
        for raw in [json!({}), json!(null), json!("garbage"), json!([1, 2])] {
            let reading = normalize_reading(&raw);
            assert!(reading.is_empty(), "input {raw} should normalize empty");
            assert_eq!(reading.device_id, "");
            assert!(reading.status.is_none());
        }
    }

    #[test]
    fn test_non_numeric_values_resolve_to_empty() {
        let raw = json!({
            "temperatureC": "not-a-number",
            "moistureLevel": true,
            "nh3Ppm": {"nested": 1},
            "ts": []
        });

        let reading = normalize_reading(&raw);
        assert_eq!(reading.temperature_c, None);
        assert_eq!(reading.moisture_percent, None);
        assert_eq!(reading.ammonia_ppm, None);
        assert_eq!(reading.timestamp, None);
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let raw = json!({ "temperatureC": " 54.5 ", "moistureLevel": "72" });
        let reading = normalize_reading(&raw);
        assert_eq!(reading.temperature_c, Some(54.5));
        assert_eq!(reading.moisture_percent, Some(72.0));
    }

    #[test]
    fn test_non_finite_strings_do_not_escape() {
        let raw = json!({ "temperatureC": "NaN", "moistureLevel": "inf" });
        let reading = normalize_reading(&raw);
        assert_eq!(reading.temperature_c, None);
        assert_eq!(reading.moisture_percent, None);
    }

    #[test]
    fn test_normalize_thresholds_canonical() {
        let raw = json!({
            "temperature": {"min": 45, "max": 60},
            "moistureLevel": {"min": 65, "max": 75},
            "nh3": {"min": 0, "max": 15}
        });

        let set = normalize_thresholds(&raw);
        assert_eq!(set.temperature, MetricBounds::new(45.0, 60.0));
        assert_eq!(set.moisture, MetricBounds::new(65.0, 75.0));
        assert_eq!(set.ammonia, MetricBounds::new(0.0, 15.0));
    }

    #[test]
    fn test_normalize_thresholds_legacy_humidity_group() {
        let raw = json!({ "humidity": {"min": 65, "max": 75} });
        let set = normalize_thresholds(&raw);
        assert_eq!(set.moisture, MetricBounds::new(65.0, 75.0));
    }

    #[test]
    fn test_renamed_group_shadows_legacy() {
        let raw = json!({
            "moistureLevel": {"min": 60, "max": 70},
            "humidity": {"min": 10, "max": 20}
        });
        assert_eq!(
            normalize_thresholds(&raw).moisture,
            MetricBounds::new(60.0, 70.0)
        );
    }

    #[test]
    fn test_normalize_thresholds_malformed_still_shapes() {
        for raw in [
            json!(null),
            json!({}),
            json!({"temperature": "broken"}),
            json!({"temperature": {"min": "x", "max": null}}),
        ] {
            let set = normalize_thresholds(&raw);
            assert!(
                !set.temperature.is_complete(),
                "input {raw} should not produce complete bounds"
            );
        }
    }

    #[test]
    fn test_inverted_bounds_pass_through_on_read() {
        // Read-side normalization does not enforce min <= max.
        let raw = json!({ "temperature": {"min": 70, "max": 50} });
        let set = normalize_thresholds(&raw);
        assert_eq!(set.temperature, MetricBounds::new(70.0, 50.0));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Any flat record normalizes without panicking, and no
            // non-finite number survives coercion.
            #[test]
            fn normalize_reading_is_total(
                fields in proptest::collection::vec(
                    ("[a-zA-Z]{1,12}", proptest::num::f64::ANY),
                    0..8,
                )
            ) {
                let mut map = serde_json::Map::new();
                for (name, number) in fields {
                    map.insert(name, Value::from(number));
                }
                let reading = normalize_reading(&Value::Object(map));
                for value in [reading.temperature_c, reading.moisture_percent, reading.ammonia_ppm] {
                    if let Some(v) = value {
                        prop_assert!(v.is_finite());
                    }
                }
            }

            #[test]
            fn normalize_thresholds_is_total(
                fields in proptest::collection::vec(
                    ("[a-zA-Z]{1,12}", "[a-zA-Z0-9 .]{0,12}"),
                    0..8,
                )
            ) {
                let mut map = serde_json::Map::new();
                for (name, text) in fields {
                    map.insert(name, Value::from(text));
                }
                let _ = normalize_thresholds(&Value::Object(map));
            }
        }
    }
}
