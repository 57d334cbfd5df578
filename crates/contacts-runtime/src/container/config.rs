//! # Runtime Configuration
//!
//! Read from environment variables; every value has a default.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DC_FIXTURE` | unset | JSON array of device records to preload |
//! | `DC_LEGACY_BACKEND` | `false` | Use the legacy address book backend |
//! | `DC_ACCESS` | `allow` | Answer to the access prompt: allow, deny, restrict |
//! | `DC_AUTHORIZATION_DELAY_MS` | `1000` | Delay before access is requested |
//! | `DC_BOOTSTRAP_TIMEOUT_MS` | `10000` | Bound on the initialization wait |

use std::path::PathBuf;
use std::time::Duration;

use dc_01_contact_source::PlatformCapabilities;
use dc_03_contact_manager::{ManagerConfig, DEFAULT_AUTHORIZATION_DELAY};
use shared_types::AccessStatus;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has invalid value {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Fixture file {0} does not exist")]
    MissingFixture(PathBuf),

    #[error("Bootstrap timeout must be greater than the authorization delay ({delay:?} >= {timeout:?})")]
    BootstrapTooShort { delay: Duration, timeout: Duration },
}

/// How the simulated access prompt is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessDecision {
    #[default]
    Allow,
    Deny,
    Restrict,
}

impl AccessDecision {
    pub fn status(self) -> AccessStatus {
        match self {
            Self::Allow => AccessStatus::Allowed,
            Self::Deny => AccessStatus::Denied,
            Self::Restrict => AccessStatus::Restricted,
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "allow" | "allowed" => Some(Self::Allow),
            "deny" | "denied" => Some(Self::Deny),
            "restrict" | "restricted" => Some(Self::Restrict),
            _ => None,
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Fixture to preload into the device store.
    pub fixture: Option<PathBuf>,
    /// Use the legacy backend instead of the modern store API.
    pub legacy_backend: bool,
    /// Answer to the access prompt.
    pub access: AccessDecision,
    /// Delay before access is requested.
    pub authorization_delay: Duration,
    /// Bound on the one-shot initialization wait.
    pub bootstrap_timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            fixture: None,
            legacy_backend: false,
            access: AccessDecision::Allow,
            authorization_delay: DEFAULT_AUTHORIZATION_DELAY,
            bootstrap_timeout: Duration::from_secs(10),
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup("DC_FIXTURE") {
            config.fixture = Some(PathBuf::from(path));
        }
        if let Some(value) = lookup("DC_LEGACY_BACKEND") {
            config.legacy_backend = value.to_lowercase() == "true" || value == "1";
        }
        if let Some(value) = lookup("DC_ACCESS") {
            config.access = AccessDecision::parse(&value).ok_or(ConfigError::InvalidValue {
                name: "DC_ACCESS",
                value,
            })?;
        }
        if let Some(value) = lookup("DC_AUTHORIZATION_DELAY_MS") {
            config.authorization_delay = parse_millis("DC_AUTHORIZATION_DELAY_MS", value)?;
        }
        if let Some(value) = lookup("DC_BOOTSTRAP_TIMEOUT_MS") {
            config.bootstrap_timeout = parse_millis("DC_BOOTSTRAP_TIMEOUT_MS", value)?;
        }

        Ok(config)
    }

    /// Check the configuration before anything is started.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.fixture {
            if !path.is_file() {
                return Err(ConfigError::MissingFixture(path.clone()));
            }
        }
        if self.authorization_delay >= self.bootstrap_timeout {
            return Err(ConfigError::BootstrapTooShort {
                delay: self.authorization_delay,
                timeout: self.bootstrap_timeout,
            });
        }
        Ok(())
    }

    pub fn manager_config(&self) -> ManagerConfig {
        ManagerConfig::default()
            .with_authorization_delay(self.authorization_delay)
            .with_capabilities(PlatformCapabilities {
                modern_store_api: !self.legacy_backend,
            })
    }
}

fn parse_millis(name: &'static str, value: String) -> Result<Duration, ConfigError> {
    match value.parse::<u64>() {
        Ok(ms) => Ok(Duration::from_millis(ms)),
        Err(_) => Err(ConfigError::InvalidValue { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert!(config.validate().is_ok());
        assert!(config.manager_config().capabilities.modern_store_api);
    }

    #[test]
    fn test_overrides() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("DC_LEGACY_BACKEND", "1"),
            ("DC_ACCESS", "Denied"),
            ("DC_AUTHORIZATION_DELAY_MS", "0"),
            ("DC_BOOTSTRAP_TIMEOUT_MS", "250"),
        ]))
        .unwrap();
        assert!(config.legacy_backend);
        assert_eq!(config.access.status(), AccessStatus::Denied);
        assert_eq!(config.bootstrap_timeout, Duration::from_millis(250));

        let manager = config.manager_config();
        assert!(!manager.capabilities.modern_store_api);
        assert_eq!(manager.authorization_delay, Duration::ZERO);
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            RuntimeConfig::from_lookup(lookup(&[("DC_ACCESS", "maybe")])),
            Err(ConfigError::InvalidValue {
                name: "DC_ACCESS",
                value: "maybe".into()
            })
        );
        assert!(RuntimeConfig::from_lookup(lookup(&[("DC_BOOTSTRAP_TIMEOUT_MS", "-5")])).is_err());
    }

    #[test]
    fn test_validate() {
        let config = RuntimeConfig {
            fixture: Some(PathBuf::from("/nonexistent/contacts.json")),
            ..RuntimeConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::MissingFixture(_))));

        let config = RuntimeConfig {
            authorization_delay: Duration::from_secs(5),
            bootstrap_timeout: Duration::from_secs(5),
            ..RuntimeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BootstrapTooShort { .. })
        ));
    }
}
