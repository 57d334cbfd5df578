//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - the contact source API
//! - Driven Ports (outbound) - the device contacts store

pub mod inbound;
pub mod outbound;

pub use inbound::{ContactSnapshot, ContactSource};
pub use outbound::DeviceContactStore;
