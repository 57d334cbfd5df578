//! Name search over the cached snapshot
//!
//! Linear case-insensitive prefix scan. Every whitespace-separated query
//! token must prefix at least one first- or last-name token.

use std::collections::BTreeMap;

use shared_types::{BasicContactData, ContactId};

use super::builder::BasicDataSnapshot;

/// Contacts whose names match `query`. An empty query matches nothing.
pub fn search(snapshot: &BasicDataSnapshot, query: &str) -> BTreeMap<ContactId, BasicContactData> {
    let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if tokens.is_empty() {
        return BTreeMap::new();
    }

    snapshot
        .iter()
        .filter(|(_, data)| matches(data, &tokens))
        .map(|(id, data)| (id.clone(), data.clone()))
        .collect()
}

fn matches(data: &BasicContactData, tokens: &[String]) -> bool {
    let names: Vec<String> = data
        .first_name
        .split_whitespace()
        .chain(data.last_name.split_whitespace())
        .map(str::to_lowercase)
        .collect();
    tokens
        .iter()
        .all(|token| names.iter().any(|name| name.starts_with(token.as_str())))
}
