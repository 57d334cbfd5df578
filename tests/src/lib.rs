//! # Device Contacts Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Synthetic contacts shared by tests and benches
//! └── integration/      # Store → source → index → manager flows
//!     ├── backend_parity.rs
//!     └── contact_flows.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p contacts-tests
//!
//! # By category
//! cargo test -p contacts-tests integration::
//!
//! # Benchmarks
//! cargo bench -p contacts-tests
//! ```

pub mod fixtures;
pub mod integration;
