//! # Phone Number Normalization
//!
//! Canonical form: an optional leading `+` followed by the ASCII digits of the
//! raw value. Every other character is dropped.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonicalized phone number used as a map key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedPhoneNumber(String);

impl NormalizedPhoneNumber {
    /// Normalize a raw phone number.
    ///
    /// Returns `None` when the raw value carries no digits.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim_start();
        let mut normalized = String::with_capacity(trimmed.len());
        if trimmed.starts_with('+') {
            normalized.push('+');
        }
        normalized.extend(trimmed.chars().filter(char::is_ascii_digit));

        if normalized.len() == usize::from(normalized.starts_with('+')) {
            return None;
        }
        Some(Self(normalized))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedPhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
