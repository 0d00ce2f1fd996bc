//! Subscription handles with RAII teardown.
//!
//! A subscription wraps a `tokio::sync::watch` receiver plus a guard
//! that notifies the store when the subscriber goes away. Teardown is
//! idempotent: `unsubscribe()` may be called any number of times
//! (including when no subscription is active), and dropping the handle
//! unsubscribes too.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value;
use tokio::sync::watch;

/// A live subscription delivering values of type `T`.
///
/// The first `changed().await` resolves immediately with the value that
/// was current at subscribe time, matching the upstream store's
/// fire-on-attach callback semantics.
#[derive(Debug)]
pub struct Subscription<T> {
    receiver: Option<watch::Receiver<T>>,
    guard: Option<SubscriptionGuard>,
}

/// Latest-value subscription (`None` until the path is first written).
pub type ValueSubscription = Subscription<Option<Value>>;

/// Bounded keyed-window subscription, entries in storage-key order.
pub type WindowSubscription = Subscription<Vec<(String, Value)>>;

impl<T: Clone + Default> Subscription<T> {
    pub(crate) fn new(receiver: watch::Receiver<T>, guard: SubscriptionGuard) -> Self {
        Self {
            receiver: Some(receiver),
            guard: Some(guard),
        }
    }

    /// Wait for the next delivery.
    ///
    /// Returns `false` once the subscription has been torn down (either
    /// side); callers use that as their loop exit.
    pub async fn changed(&mut self) -> bool {
        match self.receiver.as_mut() {
            Some(receiver) => receiver.changed().await.is_ok(),
            None => false,
        }
    }

    /// The value most recently delivered on this subscription.
    ///
    /// After teardown this returns `T::default()`.
    pub fn current(&self) -> T {
        self.receiver
            .as_ref()
            .map(|receiver| receiver.borrow().clone())
            .unwrap_or_default()
    }

    /// Whether the subscription is still attached.
    pub fn is_active(&self) -> bool {
        self.receiver.is_some()
    }

    /// Tear the subscription down.
    ///
    /// Safe to call repeatedly and when no subscription is active.
    pub fn unsubscribe(&mut self) {
        self.receiver = None;
        self.guard.take();
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        // Guard drop performs the actual detach notification.
        self.guard.take();
    }
}

/// Tracks one attached subscriber; detaches exactly once on drop.
#[derive(Debug)]
pub(crate) struct SubscriptionGuard {
    active: Arc<AtomicUsize>,
}

impl SubscriptionGuard {
    pub(crate) fn attach(active: Arc<AtomicUsize>) -> Self {
        active.fetch_add(1, Ordering::SeqCst);
        Self { active }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}
