//! Service Layer
//!
//! - `DeviceContactDataManager`: facade implementing `ContactDataApi`
//! - the serial worker owning `ContactState`

pub mod manager;
pub mod state;
mod worker;

pub use manager::DeviceContactDataManager;
pub use state::{ContactState, TopicKey};
