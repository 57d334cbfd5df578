//! Error types for the device contact store

use thiserror::Error;

/// Errors raised by the device contact store.
///
/// These never cross the `ContactSource` boundary; adapters log them and
/// collapse them into an absent result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Contacts access not granted")]
    AccessDenied,

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Save request rejected: {0}")]
    SaveRejected(String),

    #[error("Fixture error: {0}")]
    Fixture(String),
}
