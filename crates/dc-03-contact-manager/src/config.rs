//! Manager configuration

use std::time::Duration;

use dc_01_contact_source::PlatformCapabilities;
use serde::{Deserialize, Serialize};

use crate::error::ManagerError;

/// Delay before the access request is issued, to stay out of startup work.
pub const DEFAULT_AUTHORIZATION_DELAY: Duration = Duration::from_millis(1000);

/// Upper bound accepted for the authorization delay.
pub const MAX_AUTHORIZATION_DELAY: Duration = Duration::from_secs(60);

/// Contact data manager configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Delay before requesting contacts access
    pub authorization_delay: Duration,
    /// Platform capabilities used to pick the backend
    pub capabilities: PlatformCapabilities,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            authorization_delay: DEFAULT_AUTHORIZATION_DELAY,
            capabilities: PlatformCapabilities::default(),
        }
    }
}

impl ManagerConfig {
    pub fn validate(&self) -> Result<(), ManagerError> {
        if self.authorization_delay > MAX_AUTHORIZATION_DELAY {
            return Err(ManagerError::InvalidConfig(format!(
                "authorization_delay {:?} exceeds {:?}",
                self.authorization_delay, MAX_AUTHORIZATION_DELAY
            )));
        }
        Ok(())
    }

    /// Builder-style method to set the authorization delay
    pub fn with_authorization_delay(mut self, delay: Duration) -> Self {
        self.authorization_delay = delay;
        self
    }

    /// Builder-style method to set platform capabilities
    pub fn with_capabilities(mut self, capabilities: PlatformCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}
