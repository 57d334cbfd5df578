//! Domain Layer
//!
//! Pure logic over device records: field projection, merging and
//! app-specific reference decoding. No I/O.

pub mod merge;
pub mod record;
pub mod reference;

pub use merge::merge_extended;
pub use record::{
    project, ContactField, DeviceRecord, RecordKey, SaveOperation, SaveReceipt, SaveRequest,
    StoreChange,
};
pub use reference::{
    encode_app_specific_reference, parse_app_specific_reference, reference_in,
    with_app_specific_reference, RESERVED_REFERENCE_LABEL,
};
