//! # Contact Entities
//!
//! Defines the contact value types shared by the source adapters, the
//! index builder and the manager.
//!
//! ## Clusters
//!
//! - **Identity**: `ContactId`, `PeerId`
//! - **Basic Data**: `BasicContactData`, `PhoneNumberEntry`, `ImportableContactData`
//! - **Extended Data**: `ExtendedContactData`, `LabeledValue`, `PostalAddress`
//! - **References**: `AppSpecificReference`
//! - **Platform State**: `PersonNameOrder`, `AccessStatus`

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::TypeError;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Stable identifier of a device contact.
///
/// Stable across adapter restarts for the modern backend; the legacy backend
/// synthesizes it from the record id with the `ab-` prefix.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    /// Wrap a raw store identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Wrap a raw store identifier, rejecting empty values.
    pub fn parse(value: &str) -> Result<Self, TypeError> {
        if value.is_empty() {
            return Err(TypeError::EmptyContactId);
        }
        Ok(Self(value.to_string()))
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContactId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Internal application user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(pub i64);

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PeerId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id: i64 = s
            .parse()
            .map_err(|_| TypeError::InvalidPeerId(s.to_string()))?;
        if id <= 0 {
            return Err(TypeError::InvalidPeerId(s.to_string()));
        }
        Ok(Self(id))
    }
}

// =============================================================================
// CLUSTER B: BASIC DATA
// =============================================================================

/// A labeled phone number exactly as stored on the device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneNumberEntry {
    /// Store label (e.g. "mobile", "home").
    pub label: String,
    /// Raw, unnormalized number.
    pub number: String,
}

impl PhoneNumberEntry {
    pub fn new(label: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            number: number.into(),
        }
    }
}

/// The cached subset of a device contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicContactData {
    pub first_name: String,
    pub last_name: String,
    pub phone_numbers: Vec<PhoneNumberEntry>,
}

impl BasicContactData {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone_numbers: Vec<PhoneNumberEntry>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone_numbers,
        }
    }

    /// Display name honoring the platform name order.
    #[must_use]
    pub fn display_name(&self, order: PersonNameOrder) -> String {
        let (first, second) = match order {
            PersonNameOrder::FirstLast => (&self.first_name, &self.last_name),
            PersonNameOrder::LastFirst => (&self.last_name, &self.first_name),
        };
        match (first.is_empty(), second.is_empty()) {
            (false, false) => format!("{} {}", first, second),
            (false, true) => first.clone(),
            (true, false) => second.clone(),
            (true, true) => String::new(),
        }
    }
}

/// Minimal name data eligible for client-side contact import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportableContactData {
    pub first_name: String,
    pub last_name: String,
}

impl From<&BasicContactData> for ImportableContactData {
    fn from(data: &BasicContactData) -> Self {
        Self {
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
        }
    }
}

// =============================================================================
// CLUSTER C: EXTENDED DATA
// =============================================================================

/// A store value tagged with its label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabeledValue<T> {
    pub label: String,
    pub value: T,
}

impl<T> LabeledValue<T> {
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// A postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostalAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// A social network profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SocialProfile {
    pub service: String,
    pub username: String,
    pub url: String,
}

/// An instant messaging handle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstantMessagingProfile {
    pub service: String,
    pub username: String,
}

/// Full contact data read from (and written to) the device store.
///
/// Never cached by the manager; every read goes to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedContactData {
    pub basic: BasicContactData,
    #[serde(default)]
    pub middle_name: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub emails: Vec<LabeledValue<String>>,
    #[serde(default)]
    pub urls: Vec<LabeledValue<String>>,
    #[serde(default)]
    pub addresses: Vec<LabeledValue<PostalAddress>>,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub social_profiles: Vec<LabeledValue<SocialProfile>>,
    #[serde(default)]
    pub instant_messaging_profiles: Vec<LabeledValue<InstantMessagingProfile>>,
}

impl ExtendedContactData {
    /// Extended data holding only the basic fields.
    pub fn from_basic(basic: BasicContactData) -> Self {
        Self {
            basic,
            ..Self::default()
        }
    }
}

// =============================================================================
// CLUSTER D: REFERENCES
// =============================================================================

/// A device contact that carries an internal user reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSpecificReference {
    pub contact_id: ContactId,
    pub data: BasicContactData,
}

// =============================================================================
// CLUSTER E: PLATFORM STATE
// =============================================================================

/// Platform preference for composing person names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonNameOrder {
    #[default]
    FirstLast,
    LastFirst,
}

/// Device contacts authorization status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessStatus {
    #[default]
    NotDetermined,
    Allowed,
    Denied,
    Restricted,
}

impl AccessStatus {
    /// Whether the status is final (anything but `NotDetermined`).
    #[must_use]
    pub fn is_definite(self) -> bool {
        !matches!(self, Self::NotDetermined)
    }

    #[must_use]
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_id_ordering_is_string_ordering() {
        let a = ContactId::new("A");
        let b = ContactId::new("B");
        let lower = ContactId::new("a");
        assert!(a < b);
        assert!(b < lower);
    }

    #[test]
    fn test_contact_id_parse_rejects_empty() {
        assert_eq!(ContactId::parse(""), Err(TypeError::EmptyContactId));
        assert_eq!(ContactId::parse("x").unwrap().as_str(), "x");
    }

    #[test]
    fn test_peer_id_from_str() {
        assert_eq!("42".parse::<PeerId>().unwrap(), PeerId(42));
        assert!("0".parse::<PeerId>().is_err());
        assert!("-3".parse::<PeerId>().is_err());
        assert!("abc".parse::<PeerId>().is_err());
    }

    #[test]
    fn test_display_name_order() {
        let data = BasicContactData::new("Ada", "Lovelace", vec![]);
        assert_eq!(data.display_name(PersonNameOrder::FirstLast), "Ada Lovelace");
        assert_eq!(data.display_name(PersonNameOrder::LastFirst), "Lovelace Ada");

        let only_last = BasicContactData::new("", "Turing", vec![]);
        assert_eq!(only_last.display_name(PersonNameOrder::FirstLast), "Turing");
    }

    #[test]
    fn test_access_status_definite() {
        assert!(!AccessStatus::NotDetermined.is_definite());
        assert!(AccessStatus::Denied.is_definite());
        assert!(AccessStatus::Restricted.is_definite());
        assert!(AccessStatus::Allowed.is_allowed());
    }

    #[test]
    fn test_basic_data_serde() {
        let data = BasicContactData::new(
            "Al",
            "",
            vec![PhoneNumberEntry::new("mobile", "+1-555-0100")],
        );
        let json = serde_json::to_string(&data).unwrap();
        assert!(json.contains("\"first_name\":\"Al\""));
        let back: BasicContactData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
    }
}
