//! Derived index builder
//!
//! `build` turns a basic-data snapshot into the number index and the
//! importable-contact map. The snapshot is a `BTreeMap`, so contacts are
//! visited in ascending `ContactId` order; both the bucket order and the
//! importable tie-break follow from that.

use std::collections::{BTreeMap, HashMap};

use shared_types::{BasicContactData, ContactId, ImportableContactData, NormalizedPhoneNumber};
use tracing::trace;

/// Basic data keyed by contact.
pub type BasicDataSnapshot = BTreeMap<ContactId, BasicContactData>;

/// Indices derived from one snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DerivedIndices {
    /// Contacts per normalized number; each id appears once per bucket
    pub number_index: HashMap<NormalizedPhoneNumber, Vec<ContactId>>,
    /// Importable name pair per raw (unnormalized) number
    pub importable: HashMap<String, ImportableContactData>,
}

/// Rebuild both indices from `basic`.
///
/// Raw numbers without any digit are ignored by both indices.
pub fn build(basic: &BasicDataSnapshot) -> DerivedIndices {
    let mut number_index: HashMap<NormalizedPhoneNumber, Vec<ContactId>> = HashMap::new();
    let mut importable = HashMap::new();

    for (id, data) in basic {
        for phone in &data.phone_numbers {
            let Some(normalized) = NormalizedPhoneNumber::new(&phone.number) else {
                trace!(contact = %id, "Skipping phone number without digits");
                continue;
            };

            // A contact's numbers are visited together, so a repeat of the
            // same id can only sit at the end of the bucket.
            let bucket = number_index.entry(normalized).or_default();
            if bucket.last() != Some(id) {
                bucket.push(id.clone());
            }

            // Ascending id order: the first writer is the smallest id.
            importable
                .entry(phone.number.clone())
                .or_insert_with(|| ImportableContactData::from(data));
        }
    }

    DerivedIndices {
        number_index,
        importable,
    }
}

/// Contacts (with their data) indexed under `number`, by ascending id.
pub fn basic_data_for_number(
    basic: &BasicDataSnapshot,
    indices: &DerivedIndices,
    number: &NormalizedPhoneNumber,
) -> Vec<(ContactId, BasicContactData)> {
    let Some(ids) = indices.number_index.get(number) else {
        return Vec::new();
    };
    ids.iter()
        .filter_map(|id| basic.get(id).map(|data| (id.clone(), data.clone())))
        .collect()
}
