//! Modern contact store backend
//!
//! Contacts are addressed by the store's stable identifier, the snapshot is
//! read with one batch enumeration over the basic field set, and writes go
//! through a single batched save request.

use std::sync::Arc;

use shared_types::{
    ContactId, ExtendedContactData, PeerId, PersonNameOrder, PhoneNumberEntry,
};
use tokio::sync::broadcast;
use tracing::debug;

use super::common::{
    collapse, create_record, merge_into, records_referencing, snapshot_from_records,
};
use crate::domain::{ContactField, DeviceRecord, RecordKey, SaveRequest, StoreChange};
use crate::ports::{ContactSnapshot, ContactSource, DeviceContactStore};

/// Contact source over the modern store API.
pub struct ModernContactSource {
    store: Arc<dyn DeviceContactStore>,
}

impl ModernContactSource {
    pub fn new(store: Arc<dyn DeviceContactStore>) -> Self {
        Self { store }
    }

    fn key_for(id: &ContactId) -> RecordKey {
        RecordKey::Identifier(id.as_str().to_string())
    }

    fn id_for(record: &DeviceRecord) -> ContactId {
        ContactId::new(record.identifier.clone())
    }
}

impl ContactSource for ModernContactSource {
    fn retrieve_snapshot(&self) -> ContactSnapshot {
        let records = collapse("enumerate", self.store.enumerate(&ContactField::BASIC))
            .unwrap_or_default();
        let snapshot = snapshot_from_records(records, Self::id_for);
        debug!(
            contacts = snapshot.basic.len(),
            references = snapshot.references.len(),
            "Modern store snapshot"
        );
        snapshot
    }

    fn person_name_order(&self) -> PersonNameOrder {
        self.store.name_order()
    }

    fn get_extended(&self, id: &ContactId) -> Option<ExtendedContactData> {
        collapse("record", self.store.record(&Self::key_for(id)))?.map(|record| record.data)
    }

    fn append_contact_data(
        &self,
        data: &ExtendedContactData,
        to: &ContactId,
    ) -> Option<ExtendedContactData> {
        merge_into(self.store.as_ref(), Self::key_for(to), data)
    }

    fn append_phone_number(
        &self,
        phone: &PhoneNumberEntry,
        to: &ContactId,
    ) -> Option<ExtendedContactData> {
        let mut incoming = ExtendedContactData::default();
        incoming.basic.phone_numbers.push(phone.clone());
        merge_into(self.store.as_ref(), Self::key_for(to), &incoming)
    }

    fn create(&self, data: &ExtendedContactData) -> Option<(ContactId, ExtendedContactData)> {
        let record = create_record(self.store.as_ref(), data)?;
        Some((Self::id_for(&record), record.data))
    }

    fn delete_by_reference(&self, peer: PeerId) -> bool {
        let keys = records_referencing(self.store.as_ref(), peer, |record| {
            RecordKey::Identifier(record.identifier.clone())
        });
        if keys.is_empty() {
            return false;
        }
        let request = keys
            .into_iter()
            .fold(SaveRequest::new(), |request, key| request.delete(key));
        collapse("delete", self.store.execute(request)).is_some()
    }

    fn subscribe_changes(&self) -> broadcast::Receiver<StoreChange> {
        self.store.subscribe_changes()
    }
}
