//! # Contacts Runtime
//!
//! Boots the device contacts stack against an in-memory store.
//!
//! ```text
//! DC_FIXTURE=contacts.json ──► InMemoryDeviceStore
//!                                   │
//!                                   ▼
//!                     DeviceContactDataManager (serial task)
//!                                   │
//!                     ready ──► index report ──► Ctrl+C ──► shutdown
//! ```

use anyhow::{Context, Result};
use contacts_runtime::container::RuntimeConfig;
use contacts_runtime::ContactsRuntime;
use contacts_telemetry::{encode_metrics, init_telemetry, TelemetryConfig};
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry(&TelemetryConfig::from_env()).context("Failed to initialize telemetry")?;

    let config = RuntimeConfig::from_env().context("Failed to load configuration")?;
    info!(
        fixture = ?config.fixture,
        legacy_backend = config.legacy_backend,
        access = ?config.access,
        "Starting contacts runtime"
    );

    let runtime = ContactsRuntime::new(config)?;

    match runtime.bootstrap().await {
        Ok(_) => {
            runtime.report().await?;
        }
        Err(e) => warn!(error = %e, "Contact data manager did not initialize"),
    }

    match encode_metrics() {
        Ok(metrics) => debug!(%metrics, "Metrics after bootstrap"),
        Err(e) => warn!(error = %e, "Failed to encode metrics"),
    }

    info!("Contacts runtime is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown().await
}
