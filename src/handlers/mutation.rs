//! Mutation resolver: one entry point, three operations.
//!
//! Every branch checks its pre-condition against the store before writing,
//! so an illegal transition (create on a present id, update/delete on an
//! absent one) is rejected with no write. Create and update return the
//! record as re-read from the store after the write; delete returns the
//! record as it was read just before removal.
//!
//! The check and the write are separate store calls. Two concurrent creates
//! for one id can both pass the check; the later put wins.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::envelope::{CreateInput, DeleteArgs, MutationEnvelope, MutationRequest, UpdateInput};
use super::response::{respond, ResolverError, ResolverResponse};
use crate::interfaces::record_store::{RecordStore, StoreError};
use crate::record::Record;

/// Write side of the API.
pub struct MutationResolver {
    store: Arc<dyn RecordStore>,
}

impl MutationResolver {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Dispatch a classified request to its branch.
    #[tracing::instrument(
        name = "resolver.mutate",
        skip_all,
        fields(operation = %request.operation(), id = %request.id())
    )]
    pub async fn mutate(&self, request: MutationRequest) -> Result<Record, ResolverError> {
        match request {
            MutationRequest::Create(input) => self.create(input).await,
            MutationRequest::Update(input) => self.update(input).await,
            MutationRequest::Delete(args) => self.delete(args).await,
        }
    }

    /// Gateway entry point: classify by operation tag, resolve, and wrap the
    /// outcome. Unknown tags and undecodable arguments never reach the store.
    pub async fn handle(&self, event: Value) -> ResolverResponse<Record> {
        let result = match MutationEnvelope::from_value(event) {
            Ok(envelope) => {
                let caller = envelope
                    .caller()
                    .and_then(|c| c.subject())
                    .map(str::to_string);
                match MutationRequest::classify(envelope) {
                    Ok(request) => {
                        debug!(caller = ?caller, operation = %request.operation(), "Mutation received");
                        self.mutate(request).await
                    }
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        };
        respond(result)
    }

    async fn create(&self, input: CreateInput) -> Result<Record, ResolverError> {
        if self.store.get(&input.id).await?.is_some() {
            return Err(ResolverError::AlreadyExists { id: input.id });
        }

        let id = input.id.clone();
        self.store.put(Record::from(input)).await?;
        debug!(id = %id, "Record created");

        self.read_back(&id).await
    }

    async fn update(&self, input: UpdateInput) -> Result<Record, ResolverError> {
        let existing = self.require(&input.id).await?;
        let patch = input.patch().coalesce(&existing);

        self.store
            .update(&input.id, patch)
            .await
            .map_err(|e| match e {
                // Removed between the check and the write.
                StoreError::NotFound { id } => ResolverError::NotFound { id },
                other => other.into(),
            })?;
        debug!(id = %input.id, "Record updated");

        self.read_back(&input.id).await
    }

    async fn delete(&self, args: DeleteArgs) -> Result<Record, ResolverError> {
        let existing = self.require(&args.id).await?;

        self.store.delete(&args.id).await?;
        debug!(id = %args.id, "Record deleted");

        Ok(existing)
    }

    async fn require(&self, id: &str) -> Result<Record, ResolverError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ResolverError::NotFound { id: id.to_string() })
    }

    async fn read_back(&self, id: &str) -> Result<Record, ResolverError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ResolverError::InternalInconsistency { id: id.to_string() })
    }
}
