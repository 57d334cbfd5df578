//! # Error Types
//!
//! Defines error types for constructing contact values.

use thiserror::Error;

/// Errors raised when a raw value cannot become a contact type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// Contact identifiers are never empty.
    #[error("Contact identifier is empty")]
    EmptyContactId,

    /// Peer identifiers are positive integers.
    #[error("Invalid peer identifier: {0}")]
    InvalidPeerId(String),
}
