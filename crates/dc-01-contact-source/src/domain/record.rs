//! Device store records and save requests
//!
//! The store addresses a record two ways: the modern API uses the stable
//! string identifier, the legacy address book uses the integer record id.

use serde::{Deserialize, Serialize};
use shared_types::ExtendedContactData;

/// A contact as held by the device store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Stable identifier (modern store API)
    pub identifier: String,
    /// Record id (legacy address book API)
    pub legacy_id: i32,
    /// Field values
    pub data: ExtendedContactData,
}

/// How a caller addresses a record.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RecordKey {
    Identifier(String),
    Legacy(i32),
}

impl RecordKey {
    /// Whether `record` is the one this key addresses.
    pub fn matches(&self, record: &DeviceRecord) -> bool {
        match self {
            Self::Identifier(identifier) => record.identifier == *identifier,
            Self::Legacy(id) => record.legacy_id == *id,
        }
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(identifier) => write!(f, "{}", identifier),
            Self::Legacy(id) => write!(f, "legacy:{}", id),
        }
    }
}

/// Fields that can be requested during enumeration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContactField {
    GivenName,
    FamilyName,
    PhoneNumbers,
    UrlAddresses,
    MiddleName,
    NamePrefix,
    NameSuffix,
    Nickname,
    Organization,
    EmailAddresses,
    PostalAddresses,
    Birthday,
    SocialProfiles,
    InstantMessagingProfiles,
}

impl ContactField {
    /// Every field the store knows about.
    pub const ALL: [ContactField; 14] = [
        ContactField::GivenName,
        ContactField::FamilyName,
        ContactField::PhoneNumbers,
        ContactField::UrlAddresses,
        ContactField::MiddleName,
        ContactField::NamePrefix,
        ContactField::NameSuffix,
        ContactField::Nickname,
        ContactField::Organization,
        ContactField::EmailAddresses,
        ContactField::PostalAddresses,
        ContactField::Birthday,
        ContactField::SocialProfiles,
        ContactField::InstantMessagingProfiles,
    ];

    /// The fixed field set used to build the basic-data snapshot.
    pub const BASIC: [ContactField; 4] = [
        ContactField::GivenName,
        ContactField::FamilyName,
        ContactField::PhoneNumbers,
        ContactField::UrlAddresses,
    ];
}

/// Copy of `data` carrying only the requested fields.
pub fn project(data: &ExtendedContactData, keys: &[ContactField]) -> ExtendedContactData {
    let mut out = ExtendedContactData::default();
    for key in keys {
        match key {
            ContactField::GivenName => out.basic.first_name = data.basic.first_name.clone(),
            ContactField::FamilyName => out.basic.last_name = data.basic.last_name.clone(),
            ContactField::PhoneNumbers => {
                out.basic.phone_numbers = data.basic.phone_numbers.clone()
            }
            ContactField::UrlAddresses => out.urls = data.urls.clone(),
            ContactField::MiddleName => out.middle_name = data.middle_name.clone(),
            ContactField::NamePrefix => out.prefix = data.prefix.clone(),
            ContactField::NameSuffix => out.suffix = data.suffix.clone(),
            ContactField::Nickname => out.nickname = data.nickname.clone(),
            ContactField::Organization => {
                out.organization = data.organization.clone();
                out.job_title = data.job_title.clone();
                out.department = data.department.clone();
            }
            ContactField::EmailAddresses => out.emails = data.emails.clone(),
            ContactField::PostalAddresses => out.addresses = data.addresses.clone(),
            ContactField::Birthday => out.birthday = data.birthday,
            ContactField::SocialProfiles => out.social_profiles = data.social_profiles.clone(),
            ContactField::InstantMessagingProfiles => {
                out.instant_messaging_profiles = data.instant_messaging_profiles.clone()
            }
        }
    }
    out
}

/// A single write inside a save request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOperation {
    Add(ExtendedContactData),
    Update { key: RecordKey, data: ExtendedContactData },
    Delete(RecordKey),
}

/// Batched writes applied atomically by the store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SaveRequest {
    operations: Vec<SaveOperation>,
}

impl SaveRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, data: ExtendedContactData) -> Self {
        self.operations.push(SaveOperation::Add(data));
        self
    }

    pub fn update(mut self, key: RecordKey, data: ExtendedContactData) -> Self {
        self.operations.push(SaveOperation::Update { key, data });
        self
    }

    pub fn delete(mut self, key: RecordKey) -> Self {
        self.operations.push(SaveOperation::Delete(key));
        self
    }

    pub fn operations(&self) -> &[SaveOperation] {
        &self.operations
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Records created by a save request, in operation order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SaveReceipt {
    pub added: Vec<DeviceRecord>,
}

/// "Store changed" notification payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreChange {
    /// Store revision after the change
    pub revision: u64,
}
