//! Record store implementations.

use std::sync::Arc;

use tracing::info;

use crate::config::{ConfigError, StoreConfig, StoreType};

pub use crate::interfaces::record_store::{RecordStore, Result, StoreError};

pub mod memory;

#[cfg(feature = "dynamo")]
pub mod dynamo;

pub use memory::InMemoryRecordStore;

#[cfg(feature = "dynamo")]
pub use dynamo::DynamoRecordStore;

/// Initialize the record store based on configuration.
///
/// Validates the table name once; the store owns it for the rest of the
/// process lifetime.
pub async fn init_store(config: &StoreConfig) -> std::result::Result<Arc<dyn RecordStore>, ConfigError> {
    let table_name = config.table_name()?;
    info!("Store: {} table {}", config.store_type, table_name);

    match config.store_type {
        StoreType::Memory => Ok(Arc::new(InMemoryRecordStore::new())),
        #[cfg(feature = "dynamo")]
        StoreType::Dynamo => Ok(Arc::new(
            DynamoRecordStore::new(table_name, &config.dynamo).await,
        )),
        #[cfg(not(feature = "dynamo"))]
        StoreType::Dynamo => {
            tracing::error!("DynamoDB store requested but 'dynamo' feature is not enabled");
            Err(ConfigError::UnsupportedBackend(config.store_type.to_string()))
        }
    }
}
