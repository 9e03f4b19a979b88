//! Abstract interfaces for rolodex components.
//!
//! These traits define the contracts for:
//! - Record storage (the single backing table)

pub mod record_store;

pub use record_store::{RecordStore, StoreError};
