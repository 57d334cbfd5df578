//! # Service Container
//!
//! Holds the device store and the contact data manager, built explicitly
//! from a `RuntimeConfig`.

pub mod config;
pub mod services;

pub use config::{AccessDecision, ConfigError, RuntimeConfig};
pub use services::ServiceContainer;
