//! Monitor session and dashboard derivation for the Sprout composting
//! monitor.
//!
//! This crate wires the pure engine (sprout-core) to the store
//! abstraction (sprout-store): a [`MonitorSession`] attaches three
//! subscriptions to one device's subtree, keeps the slot state, and
//! publishes derived view models through watch channels. It also owns
//! the write operations the settings UI calls and the local-state-gated
//! activation policies (history retention reset, one-time seed).
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use sprout_monitor::{Config, MonitorSession};
//! use sprout_store::{DeviceFlags, MemoryFlags, MemoryStore, TelemetryStore};
//! use sprout_types::ThresholdSet;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store: Arc<dyn TelemetryStore> = Arc::new(MemoryStore::new());
//! let flags: Arc<dyn DeviceFlags> = Arc::new(MemoryFlags::new());
//!
//! let mut session = MonitorSession::start(&Config::default(), store, flags).await;
//! session.save_thresholds(&ThresholdSet::recommended()).await?;
//!
//! let dashboard = session.watch_dashboard();
//! println!("last updated: {}", dashboard.borrow().updated_label);
//! session.stop();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod demo;
pub mod session;

pub use config::{Config, ConfigError, DEVICE_ID_ENV, default_config_path};
pub use session::{MonitorSession, SessionError};
