//! Synthetic contact data.

use dc_02_contact_index::BasicDataSnapshot;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared_types::{BasicContactData, ContactId, ExtendedContactData, PhoneNumberEntry};

const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Barbara", "Claude", "Donald", "Edsger", "Frances", "Grace", "John", "Katherine",
    "Leslie", "Margaret", "Niklaus", "Radia", "Tony", "Ward",
];

const LAST_NAMES: &[&str] = &[
    "Allen", "Backus", "Dijkstra", "Hamilton", "Hoare", "Hopper", "Johnson", "Knuth", "Lamport",
    "Liskov", "Lovelace", "Perlman", "Shannon", "Turing", "Wirth",
];

/// Extended data with only basic fields set.
pub fn device_data(first: &str, last: &str, phones: &[&str]) -> ExtendedContactData {
    ExtendedContactData::from_basic(BasicContactData::new(
        first,
        last,
        phones
            .iter()
            .map(|number| PhoneNumberEntry::new("mobile", *number))
            .collect(),
    ))
}

/// Random number from a pool of `pool` numbers, in one of a few formats.
fn phone_number(rng: &mut StdRng, pool: u32) -> String {
    let n = rng.gen_range(0..pool.max(1));
    match rng.gen_range(0..3) {
        0 => format!("+1-555-{:04}", n),
        1 => format!("+1 (555) {:04}", n),
        _ => format!("+1555{:04}", n),
    }
}

/// Deterministic snapshot of `contacts` contacts.
///
/// Numbers come from a pool half the contact count, so buckets with several
/// contacts are common.
pub fn synthetic_snapshot(contacts: usize, seed: u64) -> BasicDataSnapshot {
    let mut rng = StdRng::seed_from_u64(seed);
    let pool = (contacts / 2).max(1) as u32;

    (0..contacts)
        .map(|i| {
            let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
            let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
            let phones = (0..rng.gen_range(0..4))
                .map(|_| PhoneNumberEntry::new("mobile", phone_number(&mut rng, pool)))
                .collect();
            (
                ContactId::new(format!("contact-{:06}", i)),
                BasicContactData::new(first, last, phones),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_snapshot_is_deterministic() {
        assert_eq!(synthetic_snapshot(50, 7), synthetic_snapshot(50, 7));
        assert_eq!(synthetic_snapshot(50, 7).len(), 50);
    }
}
