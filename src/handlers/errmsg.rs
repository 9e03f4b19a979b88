//! Error message constants for resolver failures.
//!
//! User-facing error messages should be sanitized to avoid leaking infrastructure details.
//! Full error details are logged internally.

/// Backing store call failed (sanitized - no SDK or table details).
pub const STORE_UNAVAILABLE: &str = "Record store temporarily unavailable";

/// Write was acknowledged but the record could not be read back.
pub const INCONSISTENT_WRITE: &str = "Record could not be read back after write";
