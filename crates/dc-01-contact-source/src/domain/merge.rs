//! Field merging for append operations
//!
//! Every merge is "insert if not structurally present": incoming values are
//! added when the record lacks them, nothing is ever removed or overwritten.

use shared_types::{ExtendedContactData, NormalizedPhoneNumber, PhoneNumberEntry};

/// Merge `incoming` into `existing`.
pub fn merge_extended(
    existing: &ExtendedContactData,
    incoming: &ExtendedContactData,
) -> ExtendedContactData {
    let mut merged = existing.clone();

    fill(&mut merged.basic.first_name, &incoming.basic.first_name);
    fill(&mut merged.basic.last_name, &incoming.basic.last_name);
    fill(&mut merged.middle_name, &incoming.middle_name);
    fill(&mut merged.prefix, &incoming.prefix);
    fill(&mut merged.suffix, &incoming.suffix);
    fill(&mut merged.nickname, &incoming.nickname);
    fill(&mut merged.organization, &incoming.organization);
    fill(&mut merged.job_title, &incoming.job_title);
    fill(&mut merged.department, &incoming.department);

    for phone in &incoming.basic.phone_numbers {
        if !has_phone(&merged.basic.phone_numbers, phone) {
            merged.basic.phone_numbers.push(phone.clone());
        }
    }
    append_missing(&mut merged.emails, &incoming.emails);
    append_missing(&mut merged.urls, &incoming.urls);
    append_missing(&mut merged.addresses, &incoming.addresses);
    append_missing(&mut merged.social_profiles, &incoming.social_profiles);
    append_missing(
        &mut merged.instant_messaging_profiles,
        &incoming.instant_messaging_profiles,
    );

    if merged.birthday.is_none() {
        merged.birthday = incoming.birthday;
    }

    merged
}

fn fill(target: &mut String, value: &str) {
    if target.is_empty() && !value.is_empty() {
        *target = value.to_string();
    }
}

fn append_missing<T: Clone + PartialEq>(target: &mut Vec<T>, incoming: &[T]) {
    for item in incoming {
        if !target.contains(item) {
            target.push(item.clone());
        }
    }
}

// Phones compare by normalized number, so a reformatted copy is not re-added.
fn has_phone(phones: &[PhoneNumberEntry], candidate: &PhoneNumberEntry) -> bool {
    let normalized = NormalizedPhoneNumber::new(&candidate.number);
    phones.iter().any(|phone| {
        phone == candidate
            || (normalized.is_some() && NormalizedPhoneNumber::new(&phone.number) == normalized)
    })
}
