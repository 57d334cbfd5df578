//! Adapters Layer
//!
//! - `InMemoryDeviceStore`: device contacts store implementation
//! - `ModernContactSource` / `LegacyContactSource`: the two backends
//! - `ContactBackend`: sealed choice between them

mod common;

pub mod backend;
pub mod legacy;
pub mod memory_store;
pub mod modern;

pub use backend::{BackendKind, ContactBackend, PlatformCapabilities};
pub use legacy::{legacy_contact_id, legacy_record_id, LegacyContactSource, LEGACY_ID_PREFIX};
pub use memory_store::InMemoryDeviceStore;
pub use modern::ModernContactSource;
