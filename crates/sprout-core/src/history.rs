//! History window reduction.
//!
//! The upstream store delivers the bounded recent-history window as
//! keyed raw records in storage-key order. This module normalizes each
//! record and orders the window newest-first by resolved timestamp.
//!
//! The reducer trusts the upstream bound and never drops or invents
//! entries. The sort is stable, so records with equal (or missing)
//! timestamps keep their delivery order.

use serde_json::Value;

use sprout_types::HistoryEntry;

use crate::normalize::normalize_reading;

/// Reduce keyed raw records to a newest-first window of readings.
///
/// Records with no resolvable timestamp sort as 0, i.e. oldest.
pub fn reduce_history(entries: Vec<(String, Value)>) -> Vec<HistoryEntry> {
    let mut window: Vec<HistoryEntry> = entries
        .into_iter()
        .map(|(key, raw)| HistoryEntry {
            reading: normalize_reading(&raw),
            key,
        })
        .collect();

    window.sort_by(|a, b| b.reading.sort_timestamp().cmp(&a.reading.sort_timestamp()));
    window
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(key: &str, raw: Value) -> (String, Value) {
        (key.to_string(), raw)
    }

    #[test]
    fn test_orders_newest_first() {
        let window = reduce_history(vec![
            entry("a", json!({"ts": 1_761_000_000i64, "temperatureC": 53})),
            entry("b", json!({"ts": 1_761_000_600i64, "temperatureC": 54})),
            entry("c", json!({"ts": 1_761_000_300i64, "temperatureC": 52})),
        ]);

        let keys: Vec<&str> = window.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "c", "a"]);
        assert_eq!(window[0].reading.temperature_c, Some(54.0));
    }

    #[test]
    fn test_missing_timestamp_sorts_oldest() {
        let window = reduce_history(vec![
            entry("no-ts", json!({"temperatureC": 50})),
            entry("with-ts", json!({"ts": 1_761_000_000i64})),
        ]);

        assert_eq!(window[0].key, "with-ts");
        assert_eq!(window[1].key, "no-ts");
        assert_eq!(window[1].reading.sort_timestamp(), 0);
    }

    #[test]
    fn test_ties_keep_delivery_order() {
        let window = reduce_history(vec![
            entry("first", json!({"ts": 1_761_000_000i64})),
            entry("second", json!({"ts": 1_761_000_000i64})),
            entry("third", json!({"ts": 1_761_000_000i64})),
        ]);

        let keys: Vec<&str> = window.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_legacy_timestamp_field_participates_in_sort() {
        let window = reduce_history(vec![
            entry("old-schema", json!({"updatedAt": 1_761_000_900i64})),
            entry("new-schema", json!({"ts": 1_761_000_000i64})),
        ]);
        assert_eq!(window[0].key, "old-schema");
    }

    #[test]
    fn test_malformed_entries_survive() {
        let window = reduce_history(vec![
            entry("junk", json!("not an object")),
            entry("real", json!({"ts": 1_761_000_000i64, "temperatureC": 55})),
        ]);

        assert_eq!(window.len(), 2);
        assert_eq!(window[0].key, "real");
        assert!(window[1].reading.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(reduce_history(Vec::new()).is_empty());
    }
}
