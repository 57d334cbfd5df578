//! # Service Container
//!
//! Construction order:
//!
//! ```text
//! fixture ──► InMemoryDeviceStore ──► DeviceContactDataManager
//!                                         └── PrometheusRecorder
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use dc_01_contact_source::InMemoryDeviceStore;
use dc_03_contact_manager::DeviceContactDataManager;
use tracing::info;

use crate::adapters::PrometheusRecorder;
use crate::container::config::RuntimeConfig;

/// Runtime services, shared by reference.
pub struct ServiceContainer {
    /// Device contacts store
    pub store: Arc<InMemoryDeviceStore>,
    /// Contact data manager running on its serial task
    pub manager: DeviceContactDataManager,
}

impl ServiceContainer {
    /// Build every service. Must run inside a tokio runtime.
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        let store = match &config.fixture {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read fixture {}", path.display()))?;
                let store = InMemoryDeviceStore::from_fixture_json(&json)
                    .with_context(|| format!("Failed to load fixture {}", path.display()))?;
                info!(path = %path.display(), records = store.len(), "Loaded device fixture");
                store
            }
            None => InMemoryDeviceStore::new(),
        };
        let store = Arc::new(store.with_prompt_answer(config.access.status()));

        let manager = DeviceContactDataManager::with_metrics(
            store.clone(),
            config.manager_config(),
            Arc::new(PrometheusRecorder),
        )
        .context("Failed to start contact data manager")?;

        Ok(Self { store, manager })
    }
}
