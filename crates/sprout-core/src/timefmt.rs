//! Staleness handling and display-time resolution.
//!
//! The device reports epoch seconds, but firmware that has not synced
//! NTP yet reports its uptime counter instead, a small number that
//! would render as a date in 1970. A reported time is trusted only
//! above [`EPOCH_SANITY_FLOOR`]; otherwise the resolver falls back to
//! the local receipt time captured when the snapshot arrived, and
//! finally to an explicit unknown sentinel. It never raises and never
//! shows a wrong-looking date.

use time::OffsetDateTime;
use tracing::warn;

/// Epoch-seconds below this are uptime counters, not wall-clock time.
///
/// 1_000_000_000 is 2001-09-09; an uptime counter in seconds cannot
/// plausibly reach it, while any real report from this device's
/// lifetime exceeds it.
pub const EPOCH_SANITY_FLOOR: i64 = 1_000_000_000;

/// Sentinel returned when no displayable time exists.
pub const UNKNOWN_TIME: &str = "unknown";

/// Dashboard display format, e.g. "10/21 12:30".
const DISPLAY_FORMAT: &str = "[month]/[day] [hour]:[minute]";

/// Whether an epoch-seconds value is plausible wall-clock time.
pub fn plausible_epoch(seconds: i64) -> bool {
    seconds > EPOCH_SANITY_FLOOR
}

fn format_instant(instant: OffsetDateTime) -> Option<String> {
    let format = match time::format_description::parse(DISPLAY_FORMAT) {
        Ok(format) => format,
        Err(e) => {
            warn!("display time format failed to parse: {e}");
            return None;
        }
    };
    instant.format(&format).ok()
}

/// Resolve the time shown for a reading.
///
/// Priority: trusted device-reported time, then the local receipt time
/// captured by the caller when the snapshot was observed, then
/// [`UNKNOWN_TIME`].
pub fn resolve_display_time(reported: Option<i64>, received: Option<OffsetDateTime>) -> String {
    if let Some(seconds) = reported.filter(|&s| plausible_epoch(s))
        && let Ok(instant) = OffsetDateTime::from_unix_timestamp(seconds)
        && let Some(label) = format_instant(instant)
    {
        return label;
    }

    if let Some(instant) = received
        && let Some(label) = format_instant(instant)
    {
        return label;
    }

    UNKNOWN_TIME.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_plausible_epoch_floor() {
        assert!(!plausible_epoch(0));
        assert!(!plausible_epoch(10));
        assert!(!plausible_epoch(EPOCH_SANITY_FLOOR));
        assert!(plausible_epoch(EPOCH_SANITY_FLOOR + 1));
        assert!(plausible_epoch(1_761_000_000));
    }

    #[test]
    fn test_trusted_reported_time_formats() {
        // 2025-10-21 04:00:00 UTC
        let label = resolve_display_time(Some(1_761_019_200), None);
        assert_eq!(label, "10/21 04:00");
    }

    #[test]
    fn test_uptime_counter_never_renders_as_date() {
        let received = datetime!(2025-10-21 12:30 UTC);
        let label = resolve_display_time(Some(10), Some(received));
        assert_eq!(label, "10/21 12:30");
        assert!(!label.starts_with("01/01"));
    }

    #[test]
    fn test_zero_timestamp_falls_back() {
        let received = datetime!(2025-10-21 12:40 UTC);
        assert_eq!(resolve_display_time(Some(0), Some(received)), "10/21 12:40");
    }

    #[test]
    fn test_unknown_sentinel_when_nothing_usable() {
        assert_eq!(resolve_display_time(None, None), UNKNOWN_TIME);
        assert_eq!(resolve_display_time(Some(10), None), UNKNOWN_TIME);
    }

    #[test]
    fn test_reported_time_preferred_over_receipt() {
        let received = datetime!(2025-10-22 09:00 UTC);
        let label = resolve_display_time(Some(1_761_019_200), Some(received));
        assert_eq!(label, "10/21 04:00");
    }
}
