//! Per-device local state flags.
//!
//! Two pieces of state live outside the remote store: when this
//! device's history was last reset, and whether its one-time seed
//! record has been written. They only gate the session's retention and
//! seed side-policies, so the interface is deliberately tiny and
//! injected into session activation so tests can swap in
//! [`MemoryFlags`] and drive the policies deterministically.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::warn;

use crate::error::{Error, Result};

/// Per-device local flag state.
pub trait DeviceFlags: Send + Sync {
    /// When this device's history was last reset, if ever.
    fn last_history_reset(&self, device_id: &str) -> Option<OffsetDateTime>;

    /// Record a history reset at the given time.
    fn record_history_reset(&self, device_id: &str, at: OffsetDateTime) -> Result<()>;

    /// Whether the one-time seed record has been written.
    fn seed_written(&self, device_id: &str) -> bool;

    /// Record that the seed record has been written.
    fn record_seed_written(&self, device_id: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FlagEntry {
    /// Epoch seconds of the last history reset.
    #[serde(skip_serializing_if = "Option::is_none")]
    last_history_reset: Option<i64>,
    #[serde(default)]
    seed_written: bool,
}

type FlagMap = HashMap<String, FlagEntry>;

fn reset_time(entry: Option<&FlagEntry>) -> Option<OffsetDateTime> {
    entry
        .and_then(|e| e.last_history_reset)
        .and_then(|seconds| OffsetDateTime::from_unix_timestamp(seconds).ok())
}

/// In-memory flags, for tests and the demo binary.
#[derive(Debug, Default)]
pub struct MemoryFlags {
    entries: Mutex<FlagMap>,
}

impl MemoryFlags {
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> MutexGuard<'_, FlagMap> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DeviceFlags for MemoryFlags {
    fn last_history_reset(&self, device_id: &str) -> Option<OffsetDateTime> {
        reset_time(self.locked().get(device_id))
    }

    fn record_history_reset(&self, device_id: &str, at: OffsetDateTime) -> Result<()> {
        self.locked()
            .entry(device_id.to_string())
            .or_default()
            .last_history_reset = Some(at.unix_timestamp());
        Ok(())
    }

    fn seed_written(&self, device_id: &str) -> bool {
        self.locked()
            .get(device_id)
            .map(|e| e.seed_written)
            .unwrap_or(false)
    }

    fn record_seed_written(&self, device_id: &str) -> Result<()> {
        self.locked()
            .entry(device_id.to_string())
            .or_default()
            .seed_written = true;
        Ok(())
    }
}

/// File-backed flags stored as JSON.
#[derive(Debug)]
pub struct FileFlags {
    path: PathBuf,
    cache: Mutex<FlagMap>,
}

impl FileFlags {
    /// Open flags at the given path; a missing file starts empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let cache = match std::fs::read_to_string(&path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| Error::FlagsParse {
                    path: path.clone(),
                    source: e,
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FlagMap::default(),
            Err(e) => {
                return Err(Error::FlagsRead {
                    path,
                    source: e,
                });
            }
        };
        Ok(Self {
            path,
            cache: Mutex::new(cache),
        })
    }

    /// Open flags at the given path, falling back to an empty state
    /// when the file is unreadable or corrupt.
    pub fn open_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::open(path) {
            Ok(flags) => flags,
            Err(e) => {
                warn!("starting with empty device flags: {e}");
                Self {
                    path: path.to_path_buf(),
                    cache: Mutex::new(FlagMap::default()),
                }
            }
        }
    }

    /// Open the default flags location.
    pub fn open_default() -> Self {
        Self::open_or_default(default_flags_path())
    }

    fn locked(&self) -> MutexGuard<'_, FlagMap> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, entries: &FlagMap) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::FlagsWrite {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let content = serde_json::to_string_pretty(entries).map_err(Error::FlagsSerialize)?;
        std::fs::write(&self.path, content).map_err(|e| Error::FlagsWrite {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl DeviceFlags for FileFlags {
    fn last_history_reset(&self, device_id: &str) -> Option<OffsetDateTime> {
        reset_time(self.locked().get(device_id))
    }

    fn record_history_reset(&self, device_id: &str, at: OffsetDateTime) -> Result<()> {
        let mut entries = self.locked();
        entries
            .entry(device_id.to_string())
            .or_default()
            .last_history_reset = Some(at.unix_timestamp());
        self.persist(&entries)
    }

    fn seed_written(&self, device_id: &str) -> bool {
        self.locked()
            .get(device_id)
            .map(|e| e.seed_written)
            .unwrap_or(false)
    }

    fn record_seed_written(&self, device_id: &str) -> Result<()> {
        let mut entries = self.locked();
        entries.entry(device_id.to_string()).or_default().seed_written = true;
        self.persist(&entries)
    }
}

/// Default flags file location.
pub fn default_flags_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sprout")
        .join("flags.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_memory_flags_default_state() {
        let flags = MemoryFlags::new();
        assert!(flags.last_history_reset("ESP32").is_none());
        assert!(!flags.seed_written("ESP32"));
    }

    #[test]
    fn test_memory_flags_record_and_read_back() {
        let flags = MemoryFlags::new();
        let at = datetime!(2025-10-21 12:00 UTC);

        flags.record_history_reset("ESP32", at).unwrap();
        flags.record_seed_written("ESP32").unwrap();

        assert_eq!(flags.last_history_reset("ESP32"), Some(at));
        assert!(flags.seed_written("ESP32"));
        // Other devices are unaffected.
        assert!(flags.last_history_reset("pile-2").is_none());
    }

    #[test]
    fn test_file_flags_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flags.json");
        let at = datetime!(2025-10-21 12:00 UTC);

        {
            let flags = FileFlags::open(&path).unwrap();
            flags.record_history_reset("ESP32", at).unwrap();
            flags.record_seed_written("ESP32").unwrap();
        }

        let reopened = FileFlags::open(&path).unwrap();
        assert_eq!(reopened.last_history_reset("ESP32"), Some(at));
        assert!(reopened.seed_written("ESP32"));
    }

    #[test]
    fn test_file_flags_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let flags = FileFlags::open(dir.path().join("missing.json")).unwrap();
        assert!(!flags.seed_written("ESP32"));
    }

    #[test]
    fn test_file_flags_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("flags.json");

        let flags = FileFlags::open(&path).unwrap();
        flags.record_seed_written("ESP32").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_open_or_default_survives_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flags.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(FileFlags::open(&path).is_err());
        let flags = FileFlags::open_or_default(&path);
        assert!(!flags.seed_written("ESP32"));
    }
}
