//! Monitor configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sprout_store::DEFAULT_DEVICE_ID;

/// Environment variable overriding the configured device id.
pub const DEVICE_ID_ENV: &str = "SPROUT_DEVICE_ID";

/// Monitor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Device whose subtree the monitor attaches to.
    pub device_id: String,
    /// Size of the bounded recent-history window.
    pub history_limit: usize,
    /// Rolling window between automatic history resets.
    pub reset_window_hours: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_id: DEFAULT_DEVICE_ID.to_string(),
            history_limit: 50,
            reset_window_hours: 72,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// A missing file yields the defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Save configuration to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Write {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Apply environment overrides (currently the device id).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(device_id) = std::env::var(DEVICE_ID_ENV)
            && !device_id.trim().is_empty()
        {
            self.device_id = device_id;
        }
        self
    }

    /// Validate the configuration and return any errors.
    ///
    /// This checks:
    /// - Device id is not empty
    /// - History window size is greater than zero
    /// - Reset window is greater than zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.device_id.trim().is_empty() {
            errors.push(ValidationError {
                field: "device_id".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.history_limit == 0 {
            errors.push(ValidationError {
                field: "history_limit".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.reset_window_hours == 0 {
            errors.push(ValidationError {
                field: "reset_window_hours".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Rolling window between automatic history resets.
    pub fn reset_window(&self) -> time::Duration {
        time::Duration::hours(self.reset_window_hours as i64)
    }
}

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sprout")
        .join("config.toml")
}

/// A single validation failure.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config from {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config from {path}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to serialize config")]
    Serialize(#[source] toml::ser::Error),

    #[error("failed to write config to {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Validation(Vec<ValidationError>),
}
