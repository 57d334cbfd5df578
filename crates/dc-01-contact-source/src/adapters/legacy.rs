//! Legacy address book backend
//!
//! Records are addressed by their integer record id. Contact ids are
//! synthesized as `ab-<record id>`. The address book copies full records on
//! read and saves one record per request.

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

/// Prefix of synthesized legacy contact ids.
pub const LEGACY_ID_PREFIX: &str = "ab-";

/// Contact id for an address book record id.
pub fn legacy_contact_id(record_id: i32) -> ContactId {
    ContactId::new(format!("{}{}", LEGACY_ID_PREFIX, record_id))
}

/// Address book record id of a synthesized contact id.
pub fn legacy_record_id(id: &ContactId) -> Option<i32> {
    id.as_str().strip_prefix(LEGACY_ID_PREFIX)?.parse().ok()
}

/// Contact source over the legacy address book API.
pub struct LegacyContactSource {
    store: Arc<dyn DeviceContactStore>,
}

impl LegacyContactSource {
    pub fn new(store: Arc<dyn DeviceContactStore>) -> Self {
        Self { store }
    }

    fn id_for(record: &DeviceRecord) -> ContactId {
        legacy_contact_id(record.legacy_id)
    }
}

impl ContactSource for LegacyContactSource {
    fn retrieve_snapshot(&self) -> ContactSnapshot {
        let records =
            collapse("enumerate", self.store.enumerate(&ContactField::ALL)).unwrap_or_default();
        let snapshot = snapshot_from_records(records, Self::id_for);
        debug!(
            contacts = snapshot.basic.len(),
            references = snapshot.references.len(),
            "Address book snapshot"
        );
        snapshot
    }

    fn person_name_order(&self) -> PersonNameOrder {
        self.store.name_order()
    }

    fn get_extended(&self, id: &ContactId) -> Option<ExtendedContactData> {
        let record_id = legacy_record_id(id)?;
        collapse("record", self.store.record(&RecordKey::Legacy(record_id)))?
            .map(|record| record.data)
    }

    fn append_contact_data(
        &self,
        data: &ExtendedContactData,
        to: &ContactId,
    ) -> Option<ExtendedContactData> {
        merge_into(self.store.as_ref(), RecordKey::Legacy(legacy_record_id(to)?), data)
    }

    fn append_phone_number(
        &self,
        phone: &PhoneNumberEntry,
        to: &ContactId,
    ) -> Option<ExtendedContactData> {
        let mut incoming = ExtendedContactData::default();
        incoming.basic.phone_numbers.push(phone.clone());
        merge_into(
            self.store.as_ref(),
            RecordKey::Legacy(legacy_record_id(to)?),
            &incoming,
        )
    }

    fn create(&self, data: &ExtendedContactData) -> Option<(ContactId, ExtendedContactData)> {
        let record = create_record(self.store.as_ref(), data)?;
        Some((Self::id_for(&record), record.data))
    }

    fn delete_by_reference(&self, peer: PeerId) -> bool {
        let keys = records_referencing(self.store.as_ref(), peer, |record| {
            RecordKey::Legacy(record.legacy_id)
        });
        let mut removed = false;
        for key in keys {
            removed |= collapse("delete", self.store.execute(SaveRequest::new().delete(key)))
                .is_some();
        }
        removed
    }

    fn subscribe_changes(&self) -> broadcast::Receiver<StoreChange> {
        self.store.subscribe_changes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_id_roundtrip() {
        let id = legacy_contact_id(42);
        assert_eq!(id.as_str(), "ab-42");
        assert_eq!(legacy_record_id(&id), Some(42));
    }

    #[test]
    fn test_foreign_ids_are_rejected() {
        assert_eq!(legacy_record_id(&ContactId::new("ABCD-1234")), None);
        assert_eq!(legacy_record_id(&ContactId::new("ab-x")), None);
    }
}
