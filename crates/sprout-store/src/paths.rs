//! Device-scoped logical paths in the real-time store.
//!
//! All monitor data lives under a single device subtree:
//!
//! | Path | Content |
//! |------|---------|
//! | `devices/{id}/telemetry/latest` | most recent raw reading |
//! | `devices/{id}/telemetry/history` | keyed append-only recent history |
//! | `devices/{id}/settings/thresholds` | configured alert thresholds |

use core::fmt;

/// Device identifier used when none is configured.
pub const DEFAULT_DEVICE_ID: &str = "ESP32";

/// Path builder for one device's subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePaths {
    device_id: String,
}

impl DevicePaths {
    /// Paths for the given device.
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
        }
    }

    /// The device identifier these paths are scoped to.
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Path of the latest-reading snapshot.
    pub fn latest(&self) -> String {
        format!("devices/{}/telemetry/latest", self.device_id)
    }

    /// Path of the keyed recent-history list.
    pub fn history(&self) -> String {
        format!("devices/{}/telemetry/history", self.device_id)
    }

    /// Path of the configured thresholds.
    pub fn thresholds(&self) -> String {
        format!("devices/{}/settings/thresholds", self.device_id)
    }
}

impl Default for DevicePaths {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICE_ID)
    }
}

impl fmt::Display for DevicePaths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "devices/{}", self.device_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_device() {
        let paths = DevicePaths::default();
        assert_eq!(paths.device_id(), "ESP32");
        assert_eq!(paths.latest(), "devices/ESP32/telemetry/latest");
    }

    #[test]
    fn test_paths_are_device_scoped() {
        let paths = DevicePaths::new("pile-2");
        assert_eq!(paths.latest(), "devices/pile-2/telemetry/latest");
        assert_eq!(paths.history(), "devices/pile-2/telemetry/history");
        assert_eq!(paths.thresholds(), "devices/pile-2/settings/thresholds");
        assert_eq!(paths.to_string(), "devices/pile-2");
    }
}
