//! In-memory RecordStore implementation.
//!
//! Backs the `memory` store type for local runs and doubles as the test
//! store: failures can be injected per direction and every round trip is
//! counted.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::interfaces::record_store::{RecordStore, Result, StoreError};
use crate::record::{Record, RecordPatch};

/// Record table held in process memory, ordered by id.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<BTreeMap<String, Record>>,
    calls: AtomicUsize,
    fail_on_read: RwLock<bool>,
    fail_on_write: RwLock<bool>,
    /// Acknowledge writes without applying them.
    drop_writes: RwLock<bool>,
    /// Apply writes, then lose the row.
    drop_after_write: RwLock<bool>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `records`.
    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        let table = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        Self {
            records: RwLock::new(table),
            ..Self::default()
        }
    }

    pub async fn set_fail_on_read(&self, fail: bool) {
        *self.fail_on_read.write().await = fail;
    }

    pub async fn set_fail_on_write(&self, fail: bool) {
        *self.fail_on_write.write().await = fail;
    }

    pub async fn set_drop_writes(&self, drop: bool) {
        *self.drop_writes.write().await = drop;
    }

    pub async fn set_drop_after_write(&self, drop: bool) {
        *self.drop_after_write.write().await = drop;
    }

    /// Number of store round trips made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Current table contents, bypassing call accounting.
    pub async fn snapshot(&self) -> Vec<Record> {
        self.records.read().await.values().cloned().collect()
    }

    async fn begin_read(&self, operation: &'static str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_on_read.read().await {
            return Err(StoreError::backend(operation, "injected read failure"));
        }
        Ok(())
    }

    /// Returns whether the write should be applied.
    async fn begin_write(&self, operation: &'static str) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_on_write.read().await {
            return Err(StoreError::backend(operation, "injected write failure"));
        }
        Ok(!*self.drop_writes.read().await)
    }

    async fn end_write(&self, id: &str) {
        if *self.drop_after_write.read().await {
            self.records.write().await.remove(id);
            debug!(id = %id, "Dropped record after write");
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get(&self, id: &str) -> Result<Option<Record>> {
        self.begin_read("get").await?;
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn put(&self, record: Record) -> Result<()> {
        if !self.begin_write("put").await? {
            return Ok(());
        }
        debug!(id = %record.id, "Stored record in memory");
        let id = record.id.clone();
        self.records.write().await.insert(id.clone(), record);
        self.end_write(&id).await;
        Ok(())
    }

    async fn update(&self, id: &str, patch: RecordPatch) -> Result<()> {
        let apply = self.begin_write("update").await?;
        {
            let mut records = self.records.write().await;
            let record = records.get_mut(id).ok_or_else(|| StoreError::NotFound {
                id: id.to_string(),
            })?;
            if !apply {
                return Ok(());
            }
            record.apply(&patch);
            debug!(id = %id, "Updated record in memory");
        }
        self.end_write(id).await;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        if !self.begin_write("delete").await? {
            return Ok(());
        }
        self.records.write().await.remove(id);
        debug!(id = %id, "Deleted record from memory");
        Ok(())
    }

    async fn scan(&self, id: Option<&str>) -> Result<Vec<Record>> {
        self.begin_read("scan").await?;
        let records = self.records.read().await;
        Ok(match id {
            Some(id) => records.get(id).cloned().into_iter().collect(),
            None => records.values().cloned().collect(),
        })
    }
}
