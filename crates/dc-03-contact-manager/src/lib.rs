//! # DC-03 Contact Manager
//!
//! Owns the cached contact snapshot, its derived indices and the
//! subscription topics, all on one serial task.
//!
//! ## Architecture
//!
//! - **Ports Layer** (`ports/`): `ContactDataApi`, the driving port
//! - **Service Layer** (`service/`):
//!   - `DeviceContactDataManager`: facade, implements `ContactDataApi`
//!   - `ContactState`: snapshot, indices and topics
//!   - the worker: commands, access signal and store changes, in order
//!
//! ## Lifecycle
//!
//! ```text
//! new() ──delay──► request access ──► Allowed ──► select backend ──► snapshot
//!                                 └─► otherwise ─► empty snapshot
//!
//! store changed ──► resync ──► rebuild indices ──► notify changed topics
//! write ok      ──► resync (before the write call returns)
//! ```
//!
//! ## Usage Example
//!
//! ```ignore
//! use dc_03_contact_manager::{ContactDataApi, DeviceContactDataManager, ManagerConfig};
//!
//! let manager = DeviceContactDataManager::new(store, ManagerConfig::default())?;
//! let mut contacts = manager.basic_data().await?;
//! while let Some(snapshot) = contacts.recv().await {
//!     println!("{} contacts", snapshot.len());
//! }
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

pub use config::{ManagerConfig, DEFAULT_AUTHORIZATION_DELAY};
pub use error::ManagerError;
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{BasicDataMap, ContactDataApi, ImportableMap, NumberMatches, ReferenceMap};
pub use service::{ContactState, DeviceContactDataManager, TopicKey};
