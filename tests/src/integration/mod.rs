//! # Integration Tests
//!
//! Device store → contact source → index builder → manager, end to end.

pub mod backend_parity;
pub mod contact_flows;
