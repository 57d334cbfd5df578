//! Backend selection
//!
//! The backend is chosen once from the platform capabilities and is fixed
//! for the lifetime of the value. There is no runtime re-probing.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared_types::{
    ContactId, ExtendedContactData, PeerId, PersonNameOrder, PhoneNumberEntry,
};
use tokio::sync::broadcast;
use tracing::info;

use super::legacy::LegacyContactSource;
use super::modern::ModernContactSource;
use crate::domain::StoreChange;
use crate::ports::{ContactSnapshot, ContactSource, DeviceContactStore};

/// What the platform offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCapabilities {
    /// Whether the modern contact store API is available
    pub modern_store_api: bool,
}

impl Default for PlatformCapabilities {
    fn default() -> Self {
        Self {
            modern_store_api: true,
        }
    }
}

/// Which backend a `ContactBackend` holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendKind {
    Modern,
    Legacy,
}

/// The two contact source variants.
pub enum ContactBackend {
    Modern(ModernContactSource),
    Legacy(LegacyContactSource),
}

impl ContactBackend {
    /// Pick the backend for `capabilities`.
    pub fn select(capabilities: PlatformCapabilities, store: Arc<dyn DeviceContactStore>) -> Self {
        let backend = if capabilities.modern_store_api {
            Self::Modern(ModernContactSource::new(store))
        } else {
            Self::Legacy(LegacyContactSource::new(store))
        };
        info!(backend = ?backend.kind(), "Selected contact backend");
        backend
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Modern(_) => BackendKind::Modern,
            Self::Legacy(_) => BackendKind::Legacy,
        }
    }

    fn source(&self) -> &dyn ContactSource {
        match self {
            Self::Modern(source) => source,
            Self::Legacy(source) => source,
        }
    }
}

impl ContactSource for ContactBackend {
    fn retrieve_snapshot(&self) -> ContactSnapshot {
        self.source().retrieve_snapshot()
    }

    fn person_name_order(&self) -> PersonNameOrder {
        self.source().person_name_order()
    }

    fn get_extended(&self, id: &ContactId) -> Option<ExtendedContactData> {
        self.source().get_extended(id)
    }

    fn append_contact_data(
        &self,
        data: &ExtendedContactData,
        to: &ContactId,
    ) -> Option<ExtendedContactData> {
        self.source().append_contact_data(data, to)
    }

    fn append_phone_number(
        &self,
        phone: &PhoneNumberEntry,
        to: &ContactId,
    ) -> Option<ExtendedContactData> {
        self.source().append_phone_number(phone, to)
    }

    fn create(&self, data: &ExtendedContactData) -> Option<(ContactId, ExtendedContactData)> {
        self.source().create(data)
    }

    fn delete_by_reference(&self, peer: PeerId) -> bool {
        self.source().delete_by_reference(peer)
    }

    fn subscribe_changes(&self) -> broadcast::Receiver<StoreChange> {
        self.source().subscribe_changes()
    }
}
