//! # Contacts Telemetry
//!
//! Structured logging and Prometheus metrics for the device contacts
//! workspace.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use contacts_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     init_telemetry(&TelemetryConfig::from_env()).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `device-contacts` | Service name in logs |
//! | `DC_LOG_LEVEL` | `info` | Log filter, falls back to `RUST_LOG` |
//! | `DC_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `DC_JSON_LOGS` | `false` | JSON log lines (default `true` in containers) |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, ACTIVE_SUBSCRIPTIONS, CONTACTS_CACHED,
    NOTIFICATIONS_PUBLISHED, REBUILD_DURATION, SNAPSHOT_REBUILDS, STORE_WRITES,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics, then install the logging subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)
}
