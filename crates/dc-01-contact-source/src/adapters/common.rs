//! Store access shared by both backends
//!
//! The backends differ in how they address records and which fields they
//! enumerate; snapshot assembly, merging and error collapsing are common.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use shared_types::{AppSpecificReference, ContactId, ExtendedContactData, PeerId};
use tracing::{debug, warn};

use crate::domain::{
    merge_extended, reference_in, ContactField, DeviceRecord, RecordKey, SaveRequest,
};
use crate::error::StoreError;
use crate::ports::{ContactSnapshot, DeviceContactStore};

/// Log a store error that is about to be collapsed into an absent result.
pub(crate) fn collapse<T>(operation: &'static str, result: Result<T, StoreError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(operation, error = %error, "Device store operation failed");
            None
        }
    }
}

/// Build a snapshot from enumerated records.
///
/// When several contacts reference the same peer, the smallest contact id
/// keeps the reference.
pub(crate) fn snapshot_from_records(
    records: Vec<DeviceRecord>,
    id_of: impl Fn(&DeviceRecord) -> ContactId,
) -> ContactSnapshot {
    let mut basic = BTreeMap::new();
    let mut references: HashMap<PeerId, AppSpecificReference> = HashMap::new();

    for record in records {
        let id = id_of(&record);
        if let Some(peer) = reference_in(&record.data.urls) {
            let reference = AppSpecificReference {
                contact_id: id.clone(),
                data: record.data.basic.clone(),
            };
            match references.entry(peer) {
                Entry::Occupied(mut existing) => {
                    if reference.contact_id < existing.get().contact_id {
                        existing.insert(reference);
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(reference);
                }
            }
        }
        basic.insert(id, record.data.basic);
    }

    ContactSnapshot { basic, references }
}

/// Merge `incoming` into the record at `key` and return the stored result.
pub(crate) fn merge_into(
    store: &dyn DeviceContactStore,
    key: RecordKey,
    incoming: &ExtendedContactData,
) -> Option<ExtendedContactData> {
    let existing = collapse("record", store.record(&key))??;
    let merged = merge_extended(&existing.data, incoming);
    if merged == existing.data {
        debug!(key = %key, "Append left the record unchanged");
        return Some(merged);
    }
    collapse("update", store.execute(SaveRequest::new().update(key, merged.clone())))?;
    Some(merged)
}

/// Create a record and return it as stored.
pub(crate) fn create_record(
    store: &dyn DeviceContactStore,
    data: &ExtendedContactData,
) -> Option<DeviceRecord> {
    let receipt = collapse("create", store.execute(SaveRequest::new().add(data.clone())))?;
    receipt.added.into_iter().next()
}

/// Keys of every record referencing `peer`.
pub(crate) fn records_referencing(
    store: &dyn DeviceContactStore,
    peer: PeerId,
    key_of: impl Fn(&DeviceRecord) -> RecordKey,
) -> Vec<RecordKey> {
    collapse("enumerate", store.enumerate(&[ContactField::UrlAddresses]))
        .unwrap_or_default()
        .iter()
        .filter(|record| reference_in(&record.data.urls) == Some(peer))
        .map(key_of)
        .collect()
}
