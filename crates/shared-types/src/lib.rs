//! # Shared Types Crate
//!
//! This crate contains the contact data model used by the contact source
//! adapters, the derived index builder and the contact data manager.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate contact types are defined here.
//! - **Value Semantics**: Every type is an immutable value with structural
//!   equality, so caches can be compared and replaced wholesale.
//! - **Ordered Identity**: `ContactId` orders by ordinary string ordering; the
//!   importable-contact tie-break depends on it.

pub mod entities;
pub mod errors;
pub mod phone;

pub use entities::*;
pub use errors::*;
pub use phone::NormalizedPhoneNumber;
