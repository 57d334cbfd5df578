//! In-memory device contacts store
//!
//! Stands in for the platform contacts database. Every successful write
//! bumps the revision and broadcasts a `StoreChange`.

use parking_lot::RwLock;
use serde::Deserialize;
use shared_types::{AccessStatus, ExtendedContactData, PersonNameOrder};
use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::{
    project, ContactField, DeviceRecord, RecordKey, SaveOperation, SaveReceipt, SaveRequest,
    StoreChange,
};
use crate::error::StoreError;
use crate::ports::DeviceContactStore;

/// Buffered change notifications per receiver.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

struct StoreState {
    records: Vec<DeviceRecord>,
    next_legacy_id: i32,
    revision: u64,
    status: AccessStatus,
    prompt_answer: AccessStatus,
    name_order: PersonNameOrder,
    failure: Option<StoreError>,
}

impl StoreState {
    fn check_readable(&self) -> Result<(), StoreError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        if !self.status.is_allowed() {
            return Err(StoreError::AccessDenied);
        }
        Ok(())
    }

    fn next_record(&mut self, identifier: String, data: ExtendedContactData) -> DeviceRecord {
        let record = DeviceRecord {
            identifier,
            legacy_id: self.next_legacy_id,
            data,
        };
        self.next_legacy_id += 1;
        record
    }

    fn position(&self, key: &RecordKey) -> Option<usize> {
        self.records.iter().position(|record| key.matches(record))
    }
}

/// Fixture entry: optional fixed identifier plus the record fields.
#[derive(Deserialize)]
struct FixtureRecord {
    #[serde(default)]
    identifier: Option<String>,
    #[serde(flatten)]
    data: ExtendedContactData,
}

/// In-memory device contacts store.
pub struct InMemoryDeviceStore {
    state: RwLock<StoreState>,
    changes: broadcast::Sender<StoreChange>,
}

impl InMemoryDeviceStore {
    /// Empty store; access is undetermined and the prompt grants it.
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            state: RwLock::new(StoreState {
                records: Vec::new(),
                next_legacy_id: 1,
                revision: 0,
                status: AccessStatus::NotDetermined,
                prompt_answer: AccessStatus::Allowed,
                name_order: PersonNameOrder::FirstLast,
                failure: None,
            }),
            changes,
        }
    }

    /// Load records from a JSON array of fixture entries.
    pub fn from_fixture_json(json: &str) -> Result<Self, StoreError> {
        let fixtures: Vec<FixtureRecord> =
            serde_json::from_str(json).map_err(|e| StoreError::Fixture(e.to_string()))?;
        let store = Self::new();
        for fixture in fixtures {
            match fixture.identifier {
                Some(identifier) => store.insert_with_identifier(identifier, fixture.data),
                None => store.insert(fixture.data),
            };
        }
        Ok(store)
    }

    /// Set what the access prompt resolves to.
    pub fn with_prompt_answer(self, answer: AccessStatus) -> Self {
        self.state.write().prompt_answer = answer;
        self
    }

    /// Set the current authorization status directly.
    pub fn with_status(self, status: AccessStatus) -> Self {
        self.state.write().status = status;
        self
    }

    pub fn with_name_order(self, order: PersonNameOrder) -> Self {
        self.state.write().name_order = order;
        self
    }

    /// Insert a record with a generated identifier.
    pub fn insert(&self, data: ExtendedContactData) -> DeviceRecord {
        let identifier = uuid::Uuid::new_v4().to_string().to_uppercase();
        self.insert_with_identifier(identifier, data)
    }

    /// Insert (or replace) the record with `identifier`.
    pub fn insert_with_identifier(
        &self,
        identifier: impl Into<String>,
        data: ExtendedContactData,
    ) -> DeviceRecord {
        let identifier = identifier.into();
        let record = {
            let mut state = self.state.write();
            let key = RecordKey::Identifier(identifier.clone());
            match state.position(&key) {
                Some(index) => {
                    state.records[index].data = data;
                    state.records[index].clone()
                }
                None => {
                    let record = state.next_record(identifier, data);
                    state.records.push(record.clone());
                    record
                }
            }
        };
        self.notify_change();
        record
    }

    /// Remove a record outside of any save request.
    pub fn remove(&self, key: &RecordKey) -> bool {
        let removed = {
            let mut state = self.state.write();
            match state.position(key) {
                Some(index) => {
                    state.records.remove(index);
                    true
                }
                None => false,
            }
        };
        if removed {
            self.notify_change();
        }
        removed
    }

    /// Make every subsequent call fail with `failure` (or recover with `None`).
    pub fn set_failure(&self, failure: Option<StoreError>) {
        self.state.write().failure = failure;
    }

    /// Broadcast a change without touching any record.
    pub fn notify_change(&self) {
        let revision = {
            let mut state = self.state.write();
            state.revision += 1;
            state.revision
        };
        // No receivers is fine: nobody is watching yet.
        let receivers = self.changes.send(StoreChange { revision }).unwrap_or(0);
        debug!(revision, receivers, "Device store changed");
    }

    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().records.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.state.read().revision
    }
}

impl Default for InMemoryDeviceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceContactStore for InMemoryDeviceStore {
    fn authorization_status(&self) -> AccessStatus {
        self.state.read().status
    }

    fn request_access(&self) -> AccessStatus {
        let mut state = self.state.write();
        if !state.status.is_definite() {
            state.status = state.prompt_answer;
        }
        state.status
    }

    fn enumerate(&self, keys: &[ContactField]) -> Result<Vec<DeviceRecord>, StoreError> {
        let state = self.state.read();
        state.check_readable()?;
        Ok(state
            .records
            .iter()
            .map(|record| DeviceRecord {
                identifier: record.identifier.clone(),
                legacy_id: record.legacy_id,
                data: project(&record.data, keys),
            })
            .collect())
    }

    fn record(&self, key: &RecordKey) -> Result<Option<DeviceRecord>, StoreError> {
        let state = self.state.read();
        state.check_readable()?;
        Ok(state.position(key).map(|index| state.records[index].clone()))
    }

    fn execute(&self, request: SaveRequest) -> Result<SaveReceipt, StoreError> {
        if request.is_empty() {
            return Ok(SaveReceipt::default());
        }

        let receipt = {
            let mut state = self.state.write();
            state.check_readable()?;

            // Validate every target before mutating so the batch is atomic.
            for operation in request.operations() {
                if let SaveOperation::Update { key, .. } | SaveOperation::Delete(key) = operation {
                    if state.position(key).is_none() {
                        return Err(StoreError::RecordNotFound(key.to_string()));
                    }
                }
            }

            let mut receipt = SaveReceipt::default();
            for operation in request.operations() {
                match operation {
                    SaveOperation::Add(data) => {
                        let identifier = uuid::Uuid::new_v4().to_string().to_uppercase();
                        let record = state.next_record(identifier, data.clone());
                        state.records.push(record.clone());
                        receipt.added.push(record);
                    }
                    SaveOperation::Update { key, data } => {
                        let index = state
                            .position(key)
                            .ok_or_else(|| StoreError::RecordNotFound(key.to_string()))?;
                        state.records[index].data = data.clone();
                    }
                    SaveOperation::Delete(key) => {
                        let index = state
                            .position(key)
                            .ok_or_else(|| StoreError::RecordNotFound(key.to_string()))?;
                        state.records.remove(index);
                    }
                }
            }
            receipt
        };

        self.notify_change();
        Ok(receipt)
    }

    fn name_order(&self) -> PersonNameOrder {
        self.state.read().name_order
    }

    fn subscribe_changes(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{BasicContactData, PhoneNumberEntry};

    fn data(first: &str, phone: &str) -> ExtendedContactData {
        ExtendedContactData::from_basic(BasicContactData::new(
            first,
            "",
            vec![PhoneNumberEntry::new("mobile", phone)],
        ))
    }

    fn allowed_store() -> InMemoryDeviceStore {
        InMemoryDeviceStore::new().with_status(AccessStatus::Allowed)
    }

    #[test]
    fn test_request_access_resolves_prompt_once() {
        let store = InMemoryDeviceStore::new().with_prompt_answer(AccessStatus::Denied);
        assert_eq!(store.authorization_status(), AccessStatus::NotDetermined);
        assert_eq!(store.request_access(), AccessStatus::Denied);

        let store = store.with_prompt_answer(AccessStatus::Allowed);
        assert_eq!(store.request_access(), AccessStatus::Denied);
    }

    #[test]
    fn test_enumerate_requires_access() {
        let store = InMemoryDeviceStore::new();
        store.insert(data("Al", "1"));
        assert_eq!(store.enumerate(&ContactField::BASIC), Err(StoreError::AccessDenied));
    }

    #[test]
    fn test_legacy_ids_are_sequential() {
        let store = allowed_store();
        let a = store.insert(data("Al", "1"));
        let b = store.insert(data("Bo", "2"));
        assert_eq!(a.legacy_id, 1);
        assert_eq!(b.legacy_id, 2);
        assert_ne!(a.identifier, b.identifier);
    }

    #[test]
    fn test_execute_is_atomic() {
        let store = allowed_store();
        store.insert_with_identifier("A", data("Al", "1"));

        let request = SaveRequest::new()
            .add(data("New", "3"))
            .delete(RecordKey::Identifier("missing".into()));
        assert!(matches!(store.execute(request), Err(StoreError::RecordNotFound(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_execute_broadcasts_change() {
        let store = allowed_store();
        let mut changes = store.subscribe_changes();

        let receipt = store.execute(SaveRequest::new().add(data("Al", "1"))).unwrap();
        assert_eq!(receipt.added.len(), 1);
        assert_eq!(changes.try_recv().unwrap().revision, store.revision());
    }

    #[test]
    fn test_failure_injection() {
        let store = allowed_store();
        store.set_failure(Some(StoreError::Unavailable("disk".into())));
        assert!(store.record(&RecordKey::Legacy(1)).is_err());
        store.set_failure(None);
        assert_eq!(store.record(&RecordKey::Legacy(1)), Ok(None));
    }

    #[test]
    fn test_fixture_loading() {
        let json = r#"[
            {"identifier": "A", "basic": {"first_name": "Al", "last_name": "", "phone_numbers": [{"label": "mobile", "number": "+1-555-0100"}]}},
            {"basic": {"first_name": "Bo", "last_name": "B", "phone_numbers": []}, "organization": "Acme"}
        ]"#;
        let store = InMemoryDeviceStore::from_fixture_json(json)
            .unwrap()
            .with_status(AccessStatus::Allowed);
        assert_eq!(store.len(), 2);

        let a = store.record(&RecordKey::Identifier("A".into())).unwrap().unwrap();
        assert_eq!(a.data.basic.first_name, "Al");

        let records = store.enumerate(&ContactField::ALL).unwrap();
        assert_eq!(records[1].data.organization, "Acme");
    }

    #[test]
    fn test_fixture_rejects_invalid_json() {
        assert!(matches!(
            InMemoryDeviceStore::from_fixture_json("{"),
            Err(StoreError::Fixture(_))
        ));
    }
}
