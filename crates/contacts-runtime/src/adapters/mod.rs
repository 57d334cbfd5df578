//! # Runtime Adapters
//!
//! Port implementations that connect the manager to runtime infrastructure.

pub mod metrics;

pub use metrics::PrometheusRecorder;
