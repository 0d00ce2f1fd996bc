//! Real-time store abstraction and local state for the Sprout
//! composting monitor.
//!
//! The monitor never talks to a backend directly: it consumes the
//! [`TelemetryStore`] trait, which mirrors the upstream store's
//! primitives (latest-value subscriptions, bounded keyed windows,
//! async writes with generated ordered keys). This crate also owns the
//! device-scoped path scheme and the small local flag state that gates
//! the session's retention and seed policies.
//!
//! # Quick Start
//!
//! ```
//! use serde_json::json;
//! use sprout_store::{DevicePaths, MemoryStore, TelemetryStore};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new();
//! let paths = DevicePaths::default();
//!
//! store.write(&paths.latest(), json!({"temperatureC": 54})).await?;
//!
//! let mut sub = store.subscribe(&paths.latest());
//! assert!(sub.changed().await);
//! assert!(sub.current().is_some());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod flags;
pub mod memory;
pub mod paths;
pub mod subscription;
pub mod traits;

pub use error::{Error, Result};
pub use flags::{DeviceFlags, FileFlags, MemoryFlags, default_flags_path};
pub use memory::MemoryStore;
pub use paths::{DEFAULT_DEVICE_ID, DevicePaths};
pub use subscription::{Subscription, ValueSubscription, WindowSubscription};
pub use traits::TelemetryStore;
