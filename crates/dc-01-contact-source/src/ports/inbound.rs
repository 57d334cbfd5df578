//! Inbound Ports (Driving Ports)
//!
//! The contact source API consumed by the contact data manager.

use std::collections::{BTreeMap, HashMap};

use shared_types::{
    AppSpecificReference, BasicContactData, ContactId, ExtendedContactData, PeerId,
    PersonNameOrder, PhoneNumberEntry,
};
use tokio::sync::broadcast;

use crate::domain::StoreChange;

/// One full read of the device store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactSnapshot {
    /// Basic data by contact
    pub basic: BTreeMap<ContactId, BasicContactData>,
    /// Contacts carrying an app-specific reference, by referenced peer
    pub references: HashMap<PeerId, AppSpecificReference>,
}

impl ContactSnapshot {
    pub fn is_empty(&self) -> bool {
        self.basic.is_empty()
    }
}

/// Contact source (Driving Port)
///
/// Every method is synchronous and blocks the calling thread on the device
/// store. Callers must run them off any shared or interactive thread.
///
/// Store failures are collapsed: lookups and writes return `None` (or
/// `false`), reads return an empty snapshot.
pub trait ContactSource: Send + Sync {
    /// Read basic data and app-specific references for every contact.
    fn retrieve_snapshot(&self) -> ContactSnapshot;

    /// Platform preference for person name composition.
    fn person_name_order(&self) -> PersonNameOrder;

    /// Full data of one contact.
    fn get_extended(&self, id: &ContactId) -> Option<ExtendedContactData>;

    /// Merge `data` into the contact and return its updated full data.
    fn append_contact_data(
        &self,
        data: &ExtendedContactData,
        to: &ContactId,
    ) -> Option<ExtendedContactData>;

    /// Add one phone number to the contact and return its updated full data.
    fn append_phone_number(
        &self,
        phone: &PhoneNumberEntry,
        to: &ContactId,
    ) -> Option<ExtendedContactData>;

    /// Create a contact.
    fn create(&self, data: &ExtendedContactData) -> Option<(ContactId, ExtendedContactData)>;

    /// Delete the contact referencing `peer`. Returns whether one was removed.
    fn delete_by_reference(&self, peer: PeerId) -> bool;

    /// "Store changed" notifications.
    fn subscribe_changes(&self) -> broadcast::Receiver<StoreChange>;
}
