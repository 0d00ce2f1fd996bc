//! Simulated-feed demo.
//!
//! Runs a full session against the in-memory store with a synthetic
//! device: jittered readings, the occasional unsynced clock (uptime
//! counter instead of epoch seconds), and the occasional stringly-typed
//! value, so the normalizer and staleness fallback are visibly
//! exercised.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::info;

use sprout_store::{DeviceFlags, MemoryFlags, MemoryStore, TelemetryStore};
use sprout_types::ThresholdSet;

use crate::config::Config;
use crate::session::MonitorSession;

/// Run the demo feed for `ticks` simulated readings.
pub async fn run(config: Config, ticks: u64) -> anyhow::Result<()> {
    let store: Arc<dyn TelemetryStore> = Arc::new(MemoryStore::new());
    let flags: Arc<dyn DeviceFlags> = Arc::new(MemoryFlags::new());

    info!("starting demo session for device '{}'", config.device_id);
    let mut session = MonitorSession::start(&config, store, flags).await;
    session.save_thresholds(&ThresholdSet::recommended()).await?;

    let mut dashboard = session.watch_dashboard();

    for tick in 0..ticks {
        let temperature = 52.0 + rand::random_range(-9.0..12.0);
        let moisture = 70.0 + rand::random_range(-8.0..8.0);
        let ammonia = 8.0 + rand::random_range(-4.0..9.0);

        let payload = if tick % 4 == 3 {
            // Device that has not synced NTP yet: uptime counter for a
            // timestamp and a stringly-typed temperature.
            json!({
                "deviceId": config.device_id,
                "status": "composting",
                "ts": tick * 2,
                "temperatureC": format!("{temperature:.1}"),
                "moistureLevel": moisture,
                "nh3Ppm": ammonia,
            })
        } else {
            json!({
                "deviceId": config.device_id,
                "status": "composting",
                "temperatureC": temperature,
                "moistureLevel": moisture,
                "nh3Ppm": ammonia,
                "rssi": -55.0 - rand::random_range(0.0..20.0),
            })
        };

        session.log_reading(payload).await?;
        dashboard.changed().await.ok();
        let view = dashboard.borrow().clone();

        println!("── updated {} ──", view.updated_label);
        println!(
            "  temperature {:>6}  moisture {:>6}  ammonia {:>6}",
            format_card(view.temperature.value, "°C", view.temperature.badge),
            format_card(view.moisture.value, "%", view.moisture.badge),
            format_card(view.ammonia.value, "ppm", view.ammonia.badge),
        );
        for alert in &view.alerts {
            println!("  • {alert}");
        }

        tokio::time::sleep(Duration::from_millis(400)).await;
    }

    let rows = session.watch_history().borrow().clone();
    println!("history window holds {} reading(s)", rows.len());

    session.stop();
    Ok(())
}

fn format_card(value: Option<f64>, unit: &str, badge: sprout_types::Badge) -> String {
    match value {
        Some(v) => format!("{v:.1}{unit} [{badge}]"),
        None => format!("—{unit} [{badge}]"),
    }
}
