//! # Backend Parity
//!
//! The modern and legacy backends read the same store differently (ids,
//! field sets) but must yield the same contacts and the same index shape.

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};
    use std::sync::Arc;

    use dc_01_contact_source::{
        legacy_record_id, with_app_specific_reference, ContactBackend, ContactSource,
        InMemoryDeviceStore, PlatformCapabilities,
    };
    use dc_02_contact_index::build;
    use shared_types::{AccessStatus, ContactId, PeerId};

    use crate::fixtures::device_data;

    fn populated_store() -> Arc<InMemoryDeviceStore> {
        let store = Arc::new(InMemoryDeviceStore::new().with_status(AccessStatus::Allowed));
        store.insert(device_data("Ada", "Lovelace", &["+44 20 7946 0000"]));
        store.insert(device_data("Alan", "Turing", &["+44 20 7946 0000", "+44 161 496 0000"]));
        store.insert(with_app_specific_reference(
            device_data("Grace", "Hopper", &["+1-555-0100"]),
            PeerId(7),
        ));
        store
    }

    fn backend(store: &Arc<InMemoryDeviceStore>, modern: bool) -> ContactBackend {
        ContactBackend::select(
            PlatformCapabilities {
                modern_store_api: modern,
            },
            store.clone(),
        )
    }

    /// Legacy ids rewritten to the record identifiers used by the modern backend.
    fn legacy_to_modern(store: &InMemoryDeviceStore) -> BTreeMap<i32, ContactId> {
        use dc_01_contact_source::{ContactField, DeviceContactStore};
        store
            .enumerate(&[ContactField::GivenName])
            .unwrap()
            .into_iter()
            .map(|record| (record.legacy_id, ContactId::new(record.identifier)))
            .collect()
    }

    #[test]
    fn test_backends_agree_on_contacts_and_indices() {
        let store = populated_store();
        let modern = backend(&store, true).retrieve_snapshot();
        let legacy = backend(&store, false).retrieve_snapshot();
        let mapping = legacy_to_modern(&store);

        assert_eq!(modern.basic.len(), legacy.basic.len());
        for (legacy_id, data) in &legacy.basic {
            let record_id = legacy_record_id(legacy_id).unwrap();
            assert_eq!(&modern.basic[&mapping[&record_id]], data);
        }

        let modern_indices = build(&modern.basic);
        let legacy_indices = build(&legacy.basic);
        let bucket_sizes = |indices: &dc_02_contact_index::DerivedIndices| {
            indices
                .number_index
                .iter()
                .map(|(number, ids)| (number.clone(), ids.len()))
                .collect::<BTreeMap<_, _>>()
        };
        assert_eq!(bucket_sizes(&modern_indices), bucket_sizes(&legacy_indices));

        let importable_keys = |indices: &dc_02_contact_index::DerivedIndices| {
            indices.importable.keys().cloned().collect::<BTreeSet<_>>()
        };
        assert_eq!(
            importable_keys(&modern_indices),
            importable_keys(&legacy_indices)
        );
    }

    #[test]
    fn test_backends_agree_on_references() {
        let store = populated_store();
        let modern = backend(&store, true).retrieve_snapshot();
        let legacy = backend(&store, false).retrieve_snapshot();

        assert_eq!(modern.references.len(), 1);
        assert_eq!(legacy.references.len(), 1);
        assert_eq!(
            modern.references[&PeerId(7)].data,
            legacy.references[&PeerId(7)].data
        );
        assert!(legacy.references[&PeerId(7)]
            .contact_id
            .as_str()
            .starts_with("ab-"));
    }

    #[test]
    fn test_backends_round_trip_writes() {
        for modern in [true, false] {
            let store = populated_store();
            let source = backend(&store, modern);

            let (id, _) = source
                .create(&with_app_specific_reference(
                    device_data("Margaret", "Hamilton", &[]),
                    PeerId(99),
                ))
                .unwrap();
            let phone = shared_types::PhoneNumberEntry::new("work", "+1-555-0199");
            let updated = source.append_phone_number(&phone, &id).unwrap();
            assert_eq!(updated.basic.phone_numbers, vec![phone]);
            assert_eq!(source.get_extended(&id).unwrap(), updated);

            assert!(source.delete_by_reference(PeerId(99)));
            assert!(source.get_extended(&id).is_none());
            assert_eq!(store.len(), 3);
        }
    }
}
