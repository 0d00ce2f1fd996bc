//! Monitor session: subscription wiring and derived view state.
//!
//! A session attaches to one device's subtree and keeps three named
//! slots (latest reading, thresholds, history window), each fed by its
//! own subscription task. Slot updates tolerate arbitrary interleaving:
//! a callback only replaces its own slot, then recomputes the derived
//! dashboard from whatever the other slots currently hold. Derived
//! state is published through `tokio::sync::watch` channels and is
//! never persisted.
//!
//! Activation also runs two local-state-gated side policies (history
//! retention reset and the one-time seed write) and exposes the write
//! operations the settings UI needs.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value, json};
use time::OffsetDateTime;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use sprout_core::{
    DashboardView, HistoryRow, derive_dashboard, history_rows, normalize_reading,
    normalize_thresholds, reduce_history, validate_draft,
};
use sprout_store::{DeviceFlags, DevicePaths, TelemetryStore};
use sprout_types::{DraftError, MetricBounds, Reading, ThresholdSet};

use crate::config::Config;

/// Errors from session write operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The threshold draft failed validation; nothing was written.
    #[error(transparent)]
    InvalidDraft(#[from] DraftError),

    /// The backing store rejected the operation.
    #[error(transparent)]
    Store(#[from] sprout_store::Error),
}

/// The three independently-updated state slots.
#[derive(Debug, Default)]
struct Slots {
    latest: Option<Reading>,
    /// Local receipt time of the latest snapshot, captured when it
    /// arrived; backs the "last updated" fallback.
    received_at: Option<OffsetDateTime>,
    thresholds: ThresholdSet,
}

/// A live monitor session for one device.
///
/// Dropping the session (or calling [`stop`](Self::stop)) tears down
/// all three subscriptions; teardown is idempotent.
pub struct MonitorSession {
    store: Arc<dyn TelemetryStore>,
    flags: Arc<dyn DeviceFlags>,
    paths: DevicePaths,
    slots: Arc<Mutex<Slots>>,
    dashboard: Arc<watch::Sender<DashboardView>>,
    history: Arc<watch::Sender<Vec<HistoryRow>>>,
    tasks: Vec<JoinHandle<()>>,
    stopped: bool,
}

fn lock(slots: &Mutex<Slots>) -> MutexGuard<'_, Slots> {
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

fn publish_dashboard(slots: &Slots, sender: &watch::Sender<DashboardView>) {
    sender.send_replace(derive_dashboard(
        slots.latest.as_ref(),
        slots.received_at,
        &slots.thresholds,
    ));
}

impl MonitorSession {
    /// Activate a session: run the side policies, then subscribe.
    ///
    /// Activation never fails; policy or subscription trouble is
    /// logged and the view degrades to the unknown state until the
    /// next valid event arrives.
    pub async fn start(
        config: &Config,
        store: Arc<dyn TelemetryStore>,
        flags: Arc<dyn DeviceFlags>,
    ) -> Self {
        let paths = DevicePaths::new(&config.device_id);
        let (dashboard, _) = watch::channel(DashboardView::default());
        let (history, _) = watch::channel(Vec::new());

        let mut session = Self {
            store,
            flags,
            paths,
            slots: Arc::new(Mutex::new(Slots::default())),
            dashboard: Arc::new(dashboard),
            history: Arc::new(history),
            tasks: Vec::new(),
            stopped: false,
        };

        session.apply_retention_policy(config).await;
        session.apply_seed_policy().await;
        session.spawn_subscriptions(config);
        session
    }

    /// The device paths this session is attached to.
    pub fn paths(&self) -> &DevicePaths {
        &self.paths
    }

    /// Watch the dashboard card view model.
    pub fn watch_dashboard(&self) -> watch::Receiver<DashboardView> {
        self.dashboard.subscribe()
    }

    /// Watch the history card rows (newest first).
    pub fn watch_history(&self) -> watch::Receiver<Vec<HistoryRow>> {
        self.history.subscribe()
    }

    /// Clear the upstream history once per rolling window.
    ///
    /// Retention policy, not correctness: it bounds what the upstream
    /// list accumulates between sessions.
    async fn apply_retention_policy(&self, config: &Config) {
        let device_id = self.paths.device_id();
        let now = OffsetDateTime::now_utc();

        if let Some(last) = self.flags.last_history_reset(device_id)
            && now - last < config.reset_window()
        {
            debug!("history reset for {device_id} is within the window");
            return;
        }

        info!("resetting telemetry history for {device_id}");
        if let Err(e) = self.store.clear(&self.paths.history()).await {
            warn!("history reset failed: {e}");
            return;
        }
        if let Err(e) = self.flags.record_history_reset(device_id, now) {
            warn!("failed to record history reset: {e}");
        }
    }

    /// Log one synthetic reading the first time a device is seen, so
    /// the first-run UI is not empty.
    async fn apply_seed_policy(&self) {
        let device_id = self.paths.device_id();
        if self.flags.seed_written(device_id) {
            return;
        }

        info!("writing one-time seed reading for {device_id}");
        // Midpoints of the recommended operating bounds.
        let seed = json!({
            "deviceId": device_id,
            "status": "seed",
            "temperatureC": 52.5,
            "moistureLevel": 70.0,
            "nh3Ppm": 7.5,
        });
        match self.log_reading(seed).await {
            Ok(_) => {
                if let Err(e) = self.flags.record_seed_written(device_id) {
                    warn!("failed to record seed flag: {e}");
                }
            }
            Err(e) => warn!("seed write failed, will retry next activation: {e}"),
        }
    }

    fn spawn_subscriptions(&mut self, config: &Config) {
        // Latest reading slot.
        let mut subscription = self.store.subscribe(&self.paths.latest());
        let slots = Arc::clone(&self.slots);
        let dashboard = Arc::clone(&self.dashboard);
        self.tasks.push(tokio::spawn(async move {
            while subscription.changed().await {
                let raw = subscription.current();
                let mut slots = lock(&slots);
                match raw {
                    Some(value) => {
                        slots.latest = Some(normalize_reading(&value));
                        slots.received_at = Some(OffsetDateTime::now_utc());
                    }
                    None => {
                        slots.latest = None;
                        slots.received_at = None;
                    }
                }
                publish_dashboard(&slots, &dashboard);
            }
            debug!("latest-reading subscription ended");
        }));

        // Thresholds slot.
        let mut subscription = self.store.subscribe(&self.paths.thresholds());
        let slots = Arc::clone(&self.slots);
        let dashboard = Arc::clone(&self.dashboard);
        self.tasks.push(tokio::spawn(async move {
            while subscription.changed().await {
                let raw = subscription.current().unwrap_or(Value::Null);
                let mut slots = lock(&slots);
                slots.thresholds = normalize_thresholds(&raw);
                publish_dashboard(&slots, &dashboard);
            }
            debug!("thresholds subscription ended");
        }));

        // History slot; independent of the other two.
        let mut subscription = self
            .store
            .subscribe_window(&self.paths.history(), config.history_limit);
        let history = Arc::clone(&self.history);
        self.tasks.push(tokio::spawn(async move {
            while subscription.changed().await {
                let rows = history_rows(&reduce_history(subscription.current()));
                history.send_replace(rows);
            }
            debug!("history subscription ended");
        }));
    }

    /// Validate and save a threshold draft.
    ///
    /// Rejected drafts name the offending metric group and nothing is
    /// written. Saving an already-canonical set is an effective no-op.
    pub async fn save_thresholds(&self, draft: &ThresholdSet) -> Result<(), SessionError> {
        validate_draft(draft)?;
        self.store
            .write(&self.paths.thresholds(), canonical_thresholds(draft))
            .await?;
        Ok(())
    }

    /// Stamp and log one telemetry record to both latest and history.
    ///
    /// When the record carries no usable timestamp it is stamped with
    /// the current epoch seconds under both `ts` and `updatedAt`.
    /// Returns the stamped payload.
    pub async fn log_reading(&self, raw: Value) -> Result<Value, SessionError> {
        let mut payload = match raw {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        let ts = normalize_reading(&Value::Object(payload.clone()))
            .timestamp
            .unwrap_or_else(|| OffsetDateTime::now_utc().unix_timestamp());
        payload.insert("ts".to_string(), json!(ts));
        payload.insert("updatedAt".to_string(), json!(ts));

        let value = Value::Object(payload);
        self.store.write(&self.paths.latest(), value.clone()).await?;
        self.store.append(&self.paths.history(), value.clone()).await?;
        Ok(value)
    }

    /// Clear the stored telemetry history.
    pub async fn clear_history(&self) -> Result<(), SessionError> {
        self.store.clear(&self.paths.history()).await?;
        Ok(())
    }

    /// Move a stored legacy `humidity` threshold group to its renamed
    /// `moistureLevel` key.
    ///
    /// One-shot maintenance operation; returns whether a migration
    /// happened. Does nothing when the renamed group already exists.
    pub async fn migrate_legacy_moisture_thresholds(&self) -> Result<bool, SessionError> {
        let path = self.paths.thresholds();
        let Some(Value::Object(mut groups)) = self.store.get(&path).await? else {
            return Ok(false);
        };
        if groups.contains_key("moistureLevel") {
            return Ok(false);
        }
        let Some(legacy) = groups.remove("humidity") else {
            return Ok(false);
        };

        groups.insert("moistureLevel".to_string(), legacy);
        self.store.write(&path, Value::Object(groups)).await?;
        info!("renamed legacy humidity thresholds to moistureLevel");
        Ok(true)
    }

    /// Deactivate: unsubscribe all three subscriptions.
    ///
    /// Idempotent; calling with no active subscriptions is a no-op.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        for task in self.tasks.drain(..) {
            task.abort();
        }
        debug!("monitor session for {} stopped", self.paths.device_id());
    }
}

impl Drop for MonitorSession {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Canonical wire shape for a validated threshold set.
fn canonical_thresholds(set: &ThresholdSet) -> Value {
    fn group(bounds: &MetricBounds) -> Value {
        json!({ "min": bounds.min, "max": bounds.max })
    }
    json!({
        "temperature": group(&set.temperature),
        "moistureLevel": group(&set.moisture),
        "nh3": group(&set.ammonia),
    })
}
