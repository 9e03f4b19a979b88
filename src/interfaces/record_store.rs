//! Record storage interface.

use async_trait::async_trait;

use crate::record::{Record, RecordPatch};

/// Result type for record store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by a record store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Record not found: id={id}")]
    NotFound { id: String },

    #[error("Store {operation} failed: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },

    #[error("Stored item could not be decoded: id={id}: {message}")]
    Decode { id: String, message: String },
}

impl StoreError {
    pub fn backend(operation: &'static str, err: impl std::fmt::Display) -> Self {
        StoreError::Backend {
            operation,
            message: err.to_string(),
        }
    }
}

/// Interface over the single record table.
///
/// Every call is one round trip to the backing store; implementations keep
/// no cache. Pre-condition checks (existence before update/delete, absence
/// before create) are the caller's responsibility.
///
/// Implementations:
/// - `DynamoRecordStore`: DynamoDB table
/// - `InMemoryRecordStore`: in-process table for local runs and tests
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Point lookup by id.
    ///
    /// Returns `None` if no record has this id.
    async fn get(&self, id: &str) -> Result<Option<Record>>;

    /// Unconditional upsert keyed by `record.id`.
    async fn put(&self, record: Record) -> Result<()>;

    /// Merge the patch into an existing record.
    ///
    /// Fails with [`StoreError::NotFound`] when `id` is absent. An empty
    /// patch writes nothing.
    async fn update(&self, id: &str, patch: RecordPatch) -> Result<()>;

    /// Remove the record. Removing a missing id is not an error.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Full-table scan, optionally restricted to an exact id match.
    ///
    /// Each call rescans and returns the complete result set.
    async fn scan(&self, id: Option<&str>) -> Result<Vec<Record>>;
}
