//! In-memory store implementation.
//!
//! An in-process stand-in for the real-time backend, used by unit
//! tests and the demo binary. It reproduces the semantics the session
//! depends on: latest-value subscriptions that fire on attach, ordered
//! append keys, bounded window delivery in key order, and clear
//! notifications.
//!
//! # Failure injection
//!
//! Write-path failures can be injected with [`MemoryStore::set_fail_writes`]
//! to exercise transport-failure handling without a real backend.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::watch;
use tracing::debug;

use crate::error::{Error, Result};
use crate::subscription::{Subscription, SubscriptionGuard, ValueSubscription, WindowSubscription};
use crate::traits::TelemetryStore;

/// In-memory [`TelemetryStore`] implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    seq: AtomicU64,
    fail_writes: AtomicBool,
    active: Arc<AtomicUsize>,
}

#[derive(Debug, Default)]
struct State {
    values: HashMap<String, watch::Sender<Option<Value>>>,
    lists: HashMap<String, ListState>,
}

#[derive(Debug, Default)]
struct ListState {
    entries: BTreeMap<String, Value>,
    watchers: Vec<WindowWatcher>,
}

#[derive(Debug)]
struct WindowWatcher {
    limit: usize,
    sender: watch::Sender<Vec<(String, Value)>>,
}

/// Last `limit` entries in storage-key (append) order.
fn window_of(entries: &BTreeMap<String, Value>, limit: usize) -> Vec<(String, Value)> {
    let skip = entries.len().saturating_sub(limit);
    entries
        .iter()
        .skip(skip)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject failures into write/append/clear.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of currently attached subscriptions (both kinds).
    pub fn active_subscriptions(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    fn locked(&self) -> MutexGuard<'_, State> {
        // A poisoned lock only means a panic elsewhere; the state map
        // itself is still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_writable(&self, path: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Rejected {
                path: path.to_string(),
                message: "injected write failure".to_string(),
            });
        }
        Ok(())
    }

    fn next_key(&self) -> String {
        // Fixed-width hex so lexicographic key order is append order.
        format!("{:012x}", self.seq.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

fn value_sender<'a>(
    state: &'a mut State,
    path: &str,
) -> &'a watch::Sender<Option<Value>> {
    state
        .values
        .entry(path.to_string())
        .or_insert_with(|| watch::channel(None).0)
}

#[async_trait]
impl TelemetryStore for MemoryStore {
    async fn get(&self, path: &str) -> Result<Option<Value>> {
        let state = self.locked();
        if let Some(sender) = state.values.get(path) {
            let current = sender.borrow().clone();
            if current.is_some() {
                return Ok(current);
            }
        }
        if let Some(list) = state.lists.get(path)
            && !list.entries.is_empty()
        {
            let map: serde_json::Map<String, Value> = list
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            return Ok(Some(Value::Object(map)));
        }
        Ok(None)
    }

    async fn write(&self, path: &str, value: Value) -> Result<()> {
        self.check_writable(path)?;
        let mut state = self.locked();
        value_sender(&mut state, path).send_replace(Some(value));
        debug!("wrote {path}");
        Ok(())
    }

    async fn append(&self, path: &str, value: Value) -> Result<String> {
        self.check_writable(path)?;
        let key = self.next_key();
        let mut state = self.locked();
        let list = state.lists.entry(path.to_string()).or_default();
        list.entries.insert(key.clone(), value);

        list.watchers.retain(|w| !w.sender.is_closed());
        for watcher in &list.watchers {
            watcher
                .sender
                .send_replace(window_of(&list.entries, watcher.limit));
        }
        debug!("appended {key} to {path}");
        Ok(key)
    }

    async fn clear(&self, path: &str) -> Result<()> {
        self.check_writable(path)?;
        let mut state = self.locked();
        if let Some(sender) = state.values.get(path) {
            sender.send_replace(None);
        }
        if let Some(list) = state.lists.get_mut(path) {
            list.entries.clear();
            list.watchers.retain(|w| !w.sender.is_closed());
            for watcher in &list.watchers {
                watcher.sender.send_replace(Vec::new());
            }
        }
        debug!("cleared {path}");
        Ok(())
    }

    fn subscribe(&self, path: &str) -> ValueSubscription {
        let mut state = self.locked();
        let mut receiver = value_sender(&mut state, path).subscribe();
        // Fire on attach with whatever is current, like the upstream
        // store's callback semantics.
        receiver.mark_changed();
        Subscription::new(receiver, SubscriptionGuard::attach(Arc::clone(&self.active)))
    }

    fn subscribe_window(&self, path: &str, limit: usize) -> WindowSubscription {
        let mut state = self.locked();
        let list = state.lists.entry(path.to_string()).or_default();
        let (sender, mut receiver) = watch::channel(window_of(&list.entries, limit));
        receiver.mark_changed();
        list.watchers.push(WindowWatcher { limit, sender });
        Subscription::new(receiver, SubscriptionGuard::attach(Arc::clone(&self.active)))
    }
}
