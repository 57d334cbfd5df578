//! # DC-02 Contact Index
//!
//! Derived indices over the basic-data snapshot.
//!
//! ## Responsibilities
//!
//! - Rebuild the normalized-number index (number → contact ids)
//! - Rebuild the importable-contact map (raw number → name pair)
//! - Per-number lookups and name search over the cached snapshot
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Soundness: every indexed id exists in the snapshot | `build` only reads the snapshot |
//! | Completeness: every (id, number) pair is indexed | `build` walks every phone of every contact |
//! | Importable tie-break: smallest `ContactId` wins | ordered iteration, first writer kept |
//! | Idempotence: equal input yields equal output | `build` is pure |
//!
//! Indices are never patched; every snapshot change rebuilds them wholesale.

pub mod domain;

pub use domain::{basic_data_for_number, build, search, BasicDataSnapshot, DerivedIndices};
