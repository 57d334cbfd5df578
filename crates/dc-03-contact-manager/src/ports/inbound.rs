//! Inbound Ports (Driving Ports)
//!
//! The API application code uses to read and write device contact data.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use shared_bus::Subscription;
use shared_types::{
    AppSpecificReference, BasicContactData, ContactId, ExtendedContactData,
    ImportableContactData, NormalizedPhoneNumber, PeerId, PersonNameOrder, PhoneNumberEntry,
};

use crate::error::ManagerError;

/// Basic data for every contact, shared between subscribers.
pub type BasicDataMap = Arc<BTreeMap<ContactId, BasicContactData>>;

/// Importable name pair per raw phone number.
pub type ImportableMap = Arc<HashMap<String, ImportableContactData>>;

/// Contacts carrying an app-specific reference, by referenced peer.
pub type ReferenceMap = Arc<HashMap<PeerId, AppSpecificReference>>;

/// Contacts listing one normalized number, by ascending id.
pub type NumberMatches = Vec<(ContactId, BasicContactData)>;

/// Contact data API (Driving Port)
///
/// Every call is queued on the manager's serial context and handled in
/// submission order.
///
/// Subscriptions deliver the current value before the handle is returned,
/// then every distinct value after a rebuild. Dropping the handle
/// unsubscribes.
///
/// Store failures never surface as errors: lookups and writes resolve to
/// `None` (or `false`). `ManagerError::Closed` means the manager stopped.
#[async_trait]
pub trait ContactDataApi: Send + Sync {
    /// Platform preference for composing person names.
    async fn person_name_order(&self) -> Result<PersonNameOrder, ManagerError>;

    /// Subscribe to basic data for every contact.
    async fn basic_data(&self) -> Result<Subscription<BasicDataMap>, ManagerError>;

    /// Subscribe to the contacts listing `number`.
    ///
    /// The topic is created on first subscribe and released after the last
    /// subscription is dropped.
    async fn basic_data_for_normalized_phone_number(
        &self,
        number: NormalizedPhoneNumber,
    ) -> Result<Subscription<NumberMatches>, ManagerError>;

    /// Subscribe to the importable-contact map.
    async fn importable(&self) -> Result<Subscription<ImportableMap>, ManagerError>;

    /// Subscribe to contacts carrying an app-specific reference.
    async fn app_specific_references(&self) -> Result<Subscription<ReferenceMap>, ManagerError>;

    /// Contacts whose name tokens are prefixed by every query token.
    async fn search(
        &self,
        query: &str,
    ) -> Result<BTreeMap<ContactId, BasicContactData>, ManagerError>;

    /// Basic data of one contact from the current snapshot.
    async fn basic_data_for_id(
        &self,
        id: &ContactId,
    ) -> Result<Option<BasicContactData>, ManagerError>;

    /// Full data of one contact, read from the store.
    async fn extended_data(
        &self,
        id: &ContactId,
    ) -> Result<Option<ExtendedContactData>, ManagerError>;

    /// Merge `data` into the contact `to`.
    async fn append_contact_data(
        &self,
        data: ExtendedContactData,
        to: &ContactId,
    ) -> Result<Option<ExtendedContactData>, ManagerError>;

    /// Add a phone number to the contact `to`.
    async fn append_phone_number(
        &self,
        phone: PhoneNumberEntry,
        to: &ContactId,
    ) -> Result<Option<ExtendedContactData>, ManagerError>;

    /// Create a contact, optionally tagged with a reference to `peer`.
    async fn create_contact_with_data(
        &self,
        data: ExtendedContactData,
        peer: Option<PeerId>,
    ) -> Result<Option<(ContactId, ExtendedContactData)>, ManagerError>;

    /// Delete the contact referencing `peer`.
    async fn delete_contact_with_app_specific_reference(
        &self,
        peer: PeerId,
    ) -> Result<bool, ManagerError>;
}
