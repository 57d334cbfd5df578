//! # DC-01 Contact Source
//!
//! Adapter layer over the device contacts store.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `DeviceRecord`, `SaveRequest`: store records and batched writes
//!   - `merge_extended`: "insert if not structurally present" merging
//!   - `parse_app_specific_reference`: reserved URL field decoding
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `ContactSource`: Driving port used by the contact data manager
//!   - `DeviceContactStore`: Driven port (the platform store)
//!
//! - **Adapters Layer** (`adapters/`): Implementations
//!   - `ContactBackend`: `Modern` or `Legacy`, chosen once
//!   - `InMemoryDeviceStore`: in-process store with change notifications
//!
//! ## Error Policy
//!
//! Store errors are logged and collapsed into absent results at the
//! `ContactSource` boundary. Callers cannot tell "not found" from "failed".
//!
//! ## Usage Example
//!
//! ```ignore
//! use dc_01_contact_source::{ContactBackend, ContactSource, InMemoryDeviceStore, PlatformCapabilities};
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryDeviceStore::new());
//! let backend = ContactBackend::select(PlatformCapabilities::default(), store);
//! let snapshot = backend.retrieve_snapshot();
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;

// Re-exports for convenience
pub use adapters::{
    legacy_contact_id, legacy_record_id, BackendKind, ContactBackend, InMemoryDeviceStore,
    LegacyContactSource, ModernContactSource, PlatformCapabilities, LEGACY_ID_PREFIX,
};
pub use domain::{
    encode_app_specific_reference, parse_app_specific_reference, with_app_specific_reference,
    ContactField, DeviceRecord, RecordKey, SaveRequest, StoreChange, RESERVED_REFERENCE_LABEL,
};
pub use error::StoreError;
pub use ports::{ContactSnapshot, ContactSource, DeviceContactStore};
