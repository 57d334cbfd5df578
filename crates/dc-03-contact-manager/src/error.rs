//! Error types for the contact data manager

use thiserror::Error;

/// Errors surfaced by the manager facade.
///
/// Store failures are not errors here: they surface as absent results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManagerError {
    /// The serial worker has stopped.
    #[error("Contact data manager is closed")]
    Closed,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
