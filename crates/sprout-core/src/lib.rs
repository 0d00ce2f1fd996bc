//! Telemetry normalization and threshold-alerting engine for the
//! Sprout composting monitor.
//!
//! This crate is the pure core of the monitor: it turns loosely-shaped
//! records from the live feed into canonical readings, classifies them
//! against user-configured thresholds, and derives the dashboard view
//! model. It performs no I/O; subscriptions and writes live in
//! sprout-store and sprout-monitor.
//!
//! # Pipeline
//!
//! - [`normalize`]: every inbound record (latest snapshot or history
//!   entry) is mapped onto the canonical shape first
//! - [`thresholds`] / [`alerts`]: recomputed whenever the latest
//!   reading or the thresholds change
//! - [`timefmt`]: decides what "last updated" time is trustworthy
//! - [`history`]: orders the bounded recent-readings window
//! - [`view`]: assembles the per-card view models
//!
//! # Quick Start
//!
//! ```
//! use serde_json::json;
//! use sprout_core::{normalize, view};
//! use sprout_types::Badge;
//!
//! let reading = normalize::normalize_reading(&json!({
//!     "temperatureC": 54, "moistureLevel": 72, "nh3Ppm": 8
//! }));
//! let thresholds = normalize::normalize_thresholds(&json!({
//!     "temperature": {"min": 45, "max": 60},
//!     "moistureLevel": {"min": 65, "max": 75},
//!     "nh3": {"min": 0, "max": 15}
//! }));
//!
//! let dashboard = view::derive_dashboard(Some(&reading), None, &thresholds);
//! assert_eq!(dashboard.temperature.badge, Badge::Normal);
//! ```

pub mod alerts;
pub mod history;
pub mod normalize;
pub mod thresholds;
pub mod timefmt;
pub mod view;

pub use alerts::{Alert, NO_ACTIVE_ALERTS, alert_lines, derive_alerts};
pub use history::reduce_history;
pub use normalize::{normalize_reading, normalize_thresholds};
pub use thresholds::{MetricBadges, evaluate, evaluate_reading, validate_draft};
pub use timefmt::{EPOCH_SANITY_FLOOR, UNKNOWN_TIME, resolve_display_time};
pub use view::{DashboardView, HistoryRow, MetricCard, derive_dashboard, history_rows};
