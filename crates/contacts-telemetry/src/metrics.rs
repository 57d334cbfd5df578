//! Prometheus metrics for the contact data manager.
//!
//! All metrics follow the naming convention: `dc_<component>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // SNAPSHOT METRICS
    // =========================================================================

    /// Snapshots applied by the manager
    pub static ref SNAPSHOT_REBUILDS: Counter = Counter::new(
        "dc_manager_snapshot_rebuilds_total",
        "Total number of contact snapshots applied"
    ).expect("metric creation failed");

    /// Time spent reading the store and rebuilding indices
    pub static ref REBUILD_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "dc_manager_rebuild_duration_seconds",
            "Time spent reading the device store and rebuilding indices"
        ).buckets(exponential_buckets(0.0001, 2.0, 14).expect("bucket creation failed"))
    ).expect("metric creation failed");

    /// Contacts in the current snapshot
    pub static ref CONTACTS_CACHED: Gauge = Gauge::new(
        "dc_manager_contacts_cached",
        "Number of contacts in the current snapshot"
    ).expect("metric creation failed");

    // =========================================================================
    // FAN-OUT METRICS
    // =========================================================================

    /// Subscriber notifications sent after rebuilds
    pub static ref NOTIFICATIONS_PUBLISHED: Counter = Counter::new(
        "dc_fanout_notifications_published_total",
        "Total subscriber notifications sent after rebuilds"
    ).expect("metric creation failed");

    /// Live subscriptions across every topic
    pub static ref ACTIVE_SUBSCRIPTIONS: Gauge = Gauge::new(
        "dc_fanout_active_subscriptions",
        "Number of live subscriptions"
    ).expect("metric creation failed");

    // =========================================================================
    // STORE METRICS
    // =========================================================================

    /// Writes by outcome; failed writes are store errors collapsed to an
    /// absent result
    pub static ref STORE_WRITES: CounterVec = CounterVec::new(
        Opts::new("dc_store_writes_total", "Device store writes by outcome"),
        &["outcome"]  // outcome: ok/failed
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Snapshot
        Box::new(SNAPSHOT_REBUILDS.clone()),
        Box::new(REBUILD_DURATION.clone()),
        Box::new(CONTACTS_CACHED.clone()),
        // Fan-out
        Box::new(NOTIFICATIONS_PUBLISHED.clone()),
        Box::new(ACTIVE_SUBSCRIPTIONS.clone()),
        // Store
        Box::new(STORE_WRITES.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_encode() {
        // A second registration in the same process is rejected, which is fine.
        let _ = register_metrics();
        SNAPSHOT_REBUILDS.inc();
        STORE_WRITES.with_label_values(&["ok"]).inc();

        let text = encode_metrics().unwrap();
        assert!(text.contains("dc_manager_snapshot_rebuilds_total"));
        assert!(text.contains("dc_store_writes_total"));
    }

    #[test]
    fn test_gauge_set() {
        ACTIVE_SUBSCRIPTIONS.set(3.0);
        assert_eq!(ACTIVE_SUBSCRIPTIONS.get(), 3.0);
    }
}
