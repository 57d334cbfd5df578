//! Ports Layer
//!
//! The driving port exposed to application code. The driven side is the
//! `ContactSource` / `DeviceContactStore` pair from `dc-01-contact-source`.

pub mod inbound;

pub use inbound::{
    BasicDataMap, ContactDataApi, ImportableMap, NumberMatches, ReferenceMap,
};
