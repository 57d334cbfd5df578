//! Domain Layer
//!
//! Pure index and search functions. No I/O, no shared state.

pub mod builder;
pub mod search;

pub use builder::{basic_data_for_number, build, BasicDataSnapshot, DerivedIndices};
pub use search::search;
