//! Metrics hooks for the contact data manager
//!
//! Instrumentation points for snapshot rebuilds, subscriber fan-out and
//! store writes.
//!
//! ## Usage
//!
//! ```ignore
//! use dc_03_contact_manager::metrics::{Metrics, MetricsRecorder};
//!
//! let metrics = Metrics::new();
//! metrics.record_rebuild(started.elapsed(), snapshot.basic.len());
//! metrics.record_notifications(notified);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Metrics collector for manager operations
///
/// Thread-safe counters and gauges.
#[derive(Default)]
pub struct Metrics {
    /// Snapshots applied (including the initial one)
    pub rebuilds: AtomicU64,
    /// Contacts in the latest snapshot
    pub contacts: AtomicU64,
    /// Subscriber notifications sent after rebuilds
    pub notifications_sent: AtomicU64,
    /// Live subscriptions across all topics
    pub active_subscriptions: AtomicU64,
    /// Write operations that produced a result
    pub writes_succeeded: AtomicU64,
    /// Write operations that collapsed to an absent result
    pub writes_failed: AtomicU64,
    /// Cumulative rebuild time in nanoseconds
    pub rebuild_time_ns: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an applied snapshot
    ///
    /// # Arguments
    /// * `duration` - Time spent reading the store and rebuilding indices
    /// * `contacts` - Contacts in the new snapshot
    pub fn record_rebuild(&self, duration: Duration, contacts: usize) {
        self.rebuilds.fetch_add(1, Ordering::Relaxed);
        self.contacts.store(contacts as u64, Ordering::Relaxed);
        self.rebuild_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn record_notifications(&self, count: usize) {
        self.notifications_sent
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn set_active_subscriptions(&self, count: usize) {
        self.active_subscriptions
            .store(count as u64, Ordering::Relaxed);
    }

    /// Record a write (append, create or delete)
    pub fn record_write(&self, succeeded: bool) {
        if succeeded {
            self.writes_succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.writes_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            rebuilds: self.rebuilds.load(Ordering::Relaxed),
            contacts: self.contacts.load(Ordering::Relaxed),
            notifications_sent: self.notifications_sent.load(Ordering::Relaxed),
            active_subscriptions: self.active_subscriptions.load(Ordering::Relaxed),
            writes_succeeded: self.writes_succeeded.load(Ordering::Relaxed),
            writes_failed: self.writes_failed.load(Ordering::Relaxed),
            avg_rebuild_ns: self.avg_rebuild_time_ns(),
        }
    }

    pub fn avg_rebuild_time_ns(&self) -> u64 {
        let total = self.rebuild_time_ns.load(Ordering::Relaxed);
        let count = self.rebuilds.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub rebuilds: u64,
    pub contacts: u64,
    pub notifications_sent: u64,
    pub active_subscriptions: u64,
    pub writes_succeeded: u64,
    pub writes_failed: u64,
    pub avg_rebuild_ns: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this trait to forward manager metrics to an external system
/// such as a Prometheus registry.
pub trait MetricsRecorder: Send + Sync {
    /// Record an applied snapshot
    fn record_rebuild(&self, duration: Duration, contacts: usize);

    /// Record notifications sent by one rebuild
    fn record_notifications(&self, count: usize);

    /// Report the number of live subscriptions
    fn set_active_subscriptions(&self, count: usize);

    /// Record a write outcome
    fn record_write(&self, succeeded: bool);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_rebuild(&self, _: Duration, _: usize) {}
    fn record_notifications(&self, _: usize) {}
    fn set_active_subscriptions(&self, _: usize) {}
    fn record_write(&self, _: bool) {}
}

impl MetricsRecorder for Metrics {
    fn record_rebuild(&self, duration: Duration, contacts: usize) {
        Metrics::record_rebuild(self, duration, contacts);
    }

    fn record_notifications(&self, count: usize) {
        Metrics::record_notifications(self, count);
    }

    fn set_active_subscriptions(&self, count: usize) {
        Metrics::set_active_subscriptions(self, count);
    }

    fn record_write(&self, succeeded: bool) {
        Metrics::record_write(self, succeeded);
    }
}
