//! Forwards manager metrics to the Prometheus registry.

use std::time::Duration;

use contacts_telemetry::{
    ACTIVE_SUBSCRIPTIONS, CONTACTS_CACHED, NOTIFICATIONS_PUBLISHED, REBUILD_DURATION,
    SNAPSHOT_REBUILDS, STORE_WRITES,
};
use dc_03_contact_manager::MetricsRecorder;

/// `MetricsRecorder` backed by the global Prometheus metrics.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusRecorder;

impl MetricsRecorder for PrometheusRecorder {
    fn record_rebuild(&self, duration: Duration, contacts: usize) {
        SNAPSHOT_REBUILDS.inc();
        REBUILD_DURATION.observe(duration.as_secs_f64());
        CONTACTS_CACHED.set(contacts as f64);
    }

    fn record_notifications(&self, count: usize) {
        NOTIFICATIONS_PUBLISHED.inc_by(count as f64);
    }

    fn set_active_subscriptions(&self, count: usize) {
        ACTIVE_SUBSCRIPTIONS.set(count as f64);
    }

    fn record_write(&self, succeeded: bool) {
        let outcome = if succeeded { "ok" } else { "failed" };
        STORE_WRITES.with_label_values(&[outcome]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwards_to_prometheus() {
        let recorder = PrometheusRecorder;
        let before = SNAPSHOT_REBUILDS.get();
        recorder.record_rebuild(Duration::from_millis(2), 7);
        assert!(SNAPSHOT_REBUILDS.get() >= before + 1.0);

        recorder.record_write(false);
        assert!(STORE_WRITES.with_label_values(&["failed"]).get() >= 1.0);
    }
}
