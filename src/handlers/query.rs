//! Query resolver: list records, optionally narrowed to one id.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::envelope::{QueryEnvelope, RecordFilter};
use super::response::{respond, ResolverError, ResolverResponse};
use crate::interfaces::record_store::RecordStore;
use crate::record::Record;

/// Read side of the API. Always answers with a sequence of records.
pub struct QueryResolver {
    store: Arc<dyn RecordStore>,
}

impl QueryResolver {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Scan the table, filtered by `filter.id` when present.
    ///
    /// No match is an empty sequence, not an error.
    #[tracing::instrument(name = "resolver.list", skip_all, fields(id = ?filter.id))]
    pub async fn list_records(&self, filter: &RecordFilter) -> Result<Vec<Record>, ResolverError> {
        let records = self.store.scan(filter.id.as_deref()).await?;
        debug!(count = records.len(), "Listed records");
        Ok(records)
    }

    /// Gateway entry point: decode the envelope, resolve, and wrap the outcome.
    pub async fn handle(&self, event: Value) -> ResolverResponse<Vec<Record>> {
        let result = match QueryEnvelope::from_value(event) {
            Ok(envelope) => {
                let caller = envelope.caller().and_then(|c| c.subject());
                debug!(caller = ?caller, "Query received");
                self.list_records(&envelope.filter()).await
            }
            Err(e) => Err(e),
        };
        respond(result)
    }
}
