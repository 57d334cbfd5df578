//! Outbound Ports (Driven Ports)
//!
//! The device contacts store the adapters sit on.

use shared_types::{AccessStatus, PersonNameOrder};
use tokio::sync::broadcast;

use crate::domain::{ContactField, DeviceRecord, RecordKey, SaveReceipt, SaveRequest, StoreChange};
use crate::error::StoreError;

/// Device contacts store (Driven Port)
///
/// All calls block. Reads require `AccessStatus::Allowed`.
pub trait DeviceContactStore: Send + Sync {
    /// Current authorization status, without prompting.
    fn authorization_status(&self) -> AccessStatus;

    /// Prompt for access if undetermined and return the resulting status.
    fn request_access(&self) -> AccessStatus;

    /// Batch enumeration of every record, carrying only `keys`.
    fn enumerate(&self, keys: &[ContactField]) -> Result<Vec<DeviceRecord>, StoreError>;

    /// One record with every field.
    fn record(&self, key: &RecordKey) -> Result<Option<DeviceRecord>, StoreError>;

    /// Apply a batch of writes atomically.
    fn execute(&self, request: SaveRequest) -> Result<SaveReceipt, StoreError>;

    /// Platform name order preference.
    fn name_order(&self) -> PersonNameOrder;

    /// Notifications emitted after every change to the store.
    fn subscribe_changes(&self) -> broadcast::Receiver<StoreChange>;
}
