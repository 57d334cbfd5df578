//! # Contacts Runtime Library
//!
//! Exposes the runtime pieces for testing. The entry point is the
//! `main.rs` binary.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment and validate it
//! 2. Build the service container (store, manager, metrics bridge)
//! 3. Wait once, bounded, for the manager to initialize
//! 4. Log the derived indices

pub mod adapters;
pub mod container;

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use contacts_telemetry::log_contact_event;
use dc_03_contact_manager::ContactDataApi;
use shared_types::{AccessStatus, NormalizedPhoneNumber};
use tracing::info;

use crate::container::{RuntimeConfig, ServiceContainer};

/// Counts logged after initialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexReport {
    pub contacts: usize,
    pub distinct_numbers: usize,
    /// Numbers listed by more than one contact
    pub shared_numbers: usize,
    pub importable_numbers: usize,
    pub references: usize,
}

/// The contacts runtime.
pub struct ContactsRuntime {
    config: RuntimeConfig,
    container: Arc<ServiceContainer>,
}

impl ContactsRuntime {
    /// Validate `config` and build the services.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        config.validate().context("Invalid runtime configuration")?;
        let container = Arc::new(ServiceContainer::new(&config)?);
        Ok(Self { config, container })
    }

    pub fn container(&self) -> &Arc<ServiceContainer> {
        &self.container
    }

    /// Wait for the manager to initialize, at most `bootstrap_timeout`.
    pub async fn bootstrap(&self) -> Result<AccessStatus> {
        let status = tokio::time::timeout(
            self.config.bootstrap_timeout,
            self.container.manager.ready(),
        )
        .await
        .context("Timed out waiting for contact data manager")??;

        log_contact_event!(info, "runtime", "Contact data manager ready", status = ?status);
        Ok(status)
    }

    /// Read the current indices through the manager's topics and log them.
    pub async fn report(&self) -> Result<IndexReport> {
        let manager = &self.container.manager;

        let basic = manager
            .basic_data()
            .await?
            .recv()
            .await
            .context("Basic data topic closed")?;
        let importable = manager
            .importable()
            .await?
            .recv()
            .await
            .context("Importable topic closed")?;
        let references = manager
            .app_specific_references()
            .await?
            .recv()
            .await
            .context("Reference topic closed")?;

        let numbers: BTreeSet<NormalizedPhoneNumber> = basic
            .values()
            .flat_map(|data| &data.phone_numbers)
            .filter_map(|phone| NormalizedPhoneNumber::new(&phone.number))
            .collect();

        let mut shared_numbers = 0;
        for number in &numbers {
            let matches = manager
                .basic_data_for_normalized_phone_number(number.clone())
                .await?
                .recv()
                .await
                .context("Number topic closed")?;
            if matches.len() > 1 {
                info!(number = %number, contacts = matches.len(), "Shared phone number");
                shared_numbers += 1;
            }
        }

        let report = IndexReport {
            contacts: basic.len(),
            distinct_numbers: numbers.len(),
            shared_numbers,
            importable_numbers: importable.len(),
            references: references.len(),
        };
        log_contact_event!(
            info,
            "runtime",
            "Derived contact indices",
            contacts = report.contacts,
            distinct_numbers = report.distinct_numbers,
            shared_numbers = report.shared_numbers,
            importable_numbers = report.importable_numbers,
            references = report.references
        );
        Ok(report)
    }

    pub async fn shutdown(&self) -> Result<()> {
        info!("Shutting down contacts runtime");
        self.container.manager.shutdown().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::AccessDecision;
    use std::io::Write;
    use std::time::Duration;

    const FIXTURE: &str = r#"[
        {"identifier": "A", "basic": {"first_name": "Al", "last_name": "", "phone_numbers": [{"label": "mobile", "number": "+1-555-0100"}]}},
        {"identifier": "B", "basic": {"first_name": "Bo", "last_name": "", "phone_numbers": [{"label": "home", "number": "+1 555 0100"}, {"label": "work", "number": "555-0199"}]}},
        {"identifier": "C", "basic": {"first_name": "Cy", "last_name": "Peer", "phone_numbers": []},
         "urls": [{"label": "messenger-peer", "value": "messenger://user?id=42"}]}
    ]"#;

    fn config_with_fixture(file: &tempfile::NamedTempFile) -> RuntimeConfig {
        RuntimeConfig {
            fixture: Some(file.path().to_path_buf()),
            authorization_delay: Duration::ZERO,
            bootstrap_timeout: Duration::from_secs(5),
            ..RuntimeConfig::default()
        }
    }

    fn fixture_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_bootstrap_and_report() {
        let file = fixture_file();
        let runtime = ContactsRuntime::new(config_with_fixture(&file)).unwrap();
        assert_eq!(runtime.bootstrap().await.unwrap(), AccessStatus::Allowed);

        let report = runtime.report().await.unwrap();
        assert_eq!(
            report,
            IndexReport {
                contacts: 3,
                distinct_numbers: 2,
                shared_numbers: 1,
                importable_numbers: 3,
                references: 1,
            }
        );
        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_denied_access_reports_nothing() {
        let file = fixture_file();
        let config = RuntimeConfig {
            access: AccessDecision::Deny,
            ..config_with_fixture(&file)
        };
        let runtime = ContactsRuntime::new(config).unwrap();
        assert_eq!(runtime.bootstrap().await.unwrap(), AccessStatus::Denied);
        assert_eq!(runtime.report().await.unwrap(), IndexReport::default());
    }

    #[tokio::test]
    async fn test_bootstrap_times_out() {
        // Built directly: validation would reject a timeout this short.
        let config = RuntimeConfig {
            authorization_delay: Duration::from_secs(30),
            bootstrap_timeout: Duration::from_millis(20),
            ..RuntimeConfig::default()
        };
        let container = Arc::new(ServiceContainer::new(&config).unwrap());
        let runtime = ContactsRuntime { config, container };
        assert!(runtime.bootstrap().await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_fixture_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        assert!(ContactsRuntime::new(config_with_fixture(&file)).is_err());
    }
}
