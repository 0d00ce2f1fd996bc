//! Trait abstraction over the real-time key-value store.
//!
//! The monitor consumes the backing store purely through this trait,
//! which mirrors the upstream primitives: latest-value subscriptions,
//! bounded keyed-window subscriptions, one-shot reads, and async
//! writes. The in-process [`MemoryStore`](crate::MemoryStore)
//! implements it for tests and the demo binary; production deployments
//! plug in the real transport behind the same seam.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::subscription::{ValueSubscription, WindowSubscription};

/// Real-time store operations consumed by the monitor session.
#[async_trait]
pub trait TelemetryStore: Send + Sync {
    /// One-shot read of the value at `path`, `None` when absent.
    async fn get(&self, path: &str) -> Result<Option<Value>>;

    /// Replace the value at `path`.
    async fn write(&self, path: &str, value: Value) -> Result<()>;

    /// Append `value` under `path` with a generated key.
    ///
    /// Keys are unique and ordered: iterating a path's entries in key
    /// order yields them in append order. Returns the generated key.
    async fn append(&self, path: &str, value: Value) -> Result<String>;

    /// Remove the value or list stored at `path`.
    async fn clear(&self, path: &str) -> Result<()>;

    /// Subscribe to the value at `path` with latest-value semantics.
    ///
    /// Fires immediately with the current value, then on every write.
    fn subscribe(&self, path: &str) -> ValueSubscription;

    /// Subscribe to the most recent `limit` entries of the list at
    /// `path`, delivered in storage-key order.
    fn subscribe_window(&self, path: &str, limit: usize) -> WindowSubscription;
}
