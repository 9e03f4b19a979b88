//! DynamoDB RecordStore implementation.
//!
//! Table schema:
//! - PK: `id` (String)
//! - `name`, `email`: String attributes
//!
//! Reads are strongly consistent so a read issued right after a write
//! observes it.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use tracing::{debug, info};

use crate::config::{DynamoConfig, TableName};
use crate::interfaces::record_store::{RecordStore, Result, StoreError};
use crate::record::{Record, RecordPatch};

const ID: &str = "id";
const NAME: &str = "name";
const EMAIL: &str = "email";

/// DynamoDB implementation of RecordStore.
pub struct DynamoRecordStore {
    client: Client,
    table_name: String,
}

impl DynamoRecordStore {
    /// Create a store for `table_name` using the default AWS credential chain.
    ///
    /// `config.endpoint_url` points the client at a local emulator instead of
    /// the regional endpoint.
    pub async fn new(table_name: TableName, config: &DynamoConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(aws_sdk_dynamodb::config::Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let client = if let Some(endpoint) = config.endpoint_url.as_deref() {
            let dynamo_config = aws_sdk_dynamodb::config::Builder::from(&sdk_config)
                .endpoint_url(endpoint)
                .build();
            Client::from_conf(dynamo_config)
        } else {
            Client::new(&sdk_config)
        };

        info!(table = %table_name, "Connected to DynamoDB for records");

        Self::from_client(client, table_name)
    }

    /// Wrap an already configured client.
    pub fn from_client(client: Client, table_name: TableName) -> Self {
        Self {
            client,
            table_name: table_name.into_inner(),
        }
    }

    fn key(id: &str) -> AttributeValue {
        AttributeValue::S(id.to_string())
    }
}

fn to_item(record: Record) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (ID.to_string(), AttributeValue::S(record.id)),
        (NAME.to_string(), AttributeValue::S(record.name)),
        (EMAIL.to_string(), AttributeValue::S(record.email)),
    ])
}

fn from_item(item: &HashMap<String, AttributeValue>) -> Result<Record> {
    let id = string_attr(item, ID, "<unknown>")?;
    let name = string_attr(item, NAME, &id)?;
    let email = string_attr(item, EMAIL, &id)?;
    Ok(Record { id, name, email })
}

fn string_attr(item: &HashMap<String, AttributeValue>, attr: &str, id: &str) -> Result<String> {
    match item.get(attr) {
        Some(AttributeValue::S(value)) => Ok(value.clone()),
        Some(_) => Err(StoreError::Decode {
            id: id.to_string(),
            message: format!("attribute '{}' is not a string", attr),
        }),
        None => Err(StoreError::Decode {
            id: id.to_string(),
            message: format!("attribute '{}' is missing", attr),
        }),
    }
}

#[async_trait]
impl RecordStore for DynamoRecordStore {
    async fn get(&self, id: &str) -> Result<Option<Record>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ID, Self::key(id))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| StoreError::backend("get", DisplayErrorContext(&e)))?;

        debug!(table = %self.table_name, id = %id, found = result.item.is_some(), "Read record from DynamoDB");

        result.item.as_ref().map(from_item).transpose()
    }

    async fn put(&self, record: Record) -> Result<()> {
        let id = record.id.clone();

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(to_item(record)))
            .send()
            .await
            .map_err(|e| StoreError::backend("put", DisplayErrorContext(&e)))?;

        debug!(table = %self.table_name, id = %id, "Stored record in DynamoDB");
        Ok(())
    }

    async fn update(&self, id: &str, patch: RecordPatch) -> Result<()> {
        if patch.is_empty() {
            // No SET clause to send; still honour the missing-id contract.
            return match self.get(id).await? {
                Some(_) => Ok(()),
                None => Err(StoreError::NotFound { id: id.to_string() }),
            };
        }

        let mut assignments = Vec::with_capacity(2);
        let mut request = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(ID, Self::key(id))
            .condition_expression("attribute_exists(#id)")
            .expression_attribute_names("#id", ID);

        // `name` is a DynamoDB reserved word, so every attribute goes through a placeholder.
        if let Some(name) = patch.name {
            assignments.push("#name = :name");
            request = request
                .expression_attribute_names("#name", NAME)
                .expression_attribute_values(":name", AttributeValue::S(name));
        }
        if let Some(email) = patch.email {
            assignments.push("#email = :email");
            request = request
                .expression_attribute_names("#email", EMAIL)
                .expression_attribute_values(":email", AttributeValue::S(email));
        }

        request
            .update_expression(format!("SET {}", assignments.join(", ")))
            .send()
            .await
            .map_err(|e| {
                let missing = e
                    .as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                    .unwrap_or(false);
                if missing {
                    StoreError::NotFound { id: id.to_string() }
                } else {
                    StoreError::backend("update", DisplayErrorContext(&e))
                }
            })?;

        debug!(table = %self.table_name, id = %id, "Updated record in DynamoDB");
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(ID, Self::key(id))
            .send()
            .await
            .map_err(|e| StoreError::backend("delete", DisplayErrorContext(&e)))?;

        debug!(table = %self.table_name, id = %id, "Deleted record from DynamoDB");
        Ok(())
    }

    async fn scan(&self, id: Option<&str>) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;
        let mut pages = 0usize;

        loop {
            let mut request = self
                .client
                .scan()
                .table_name(&self.table_name)
                .consistent_read(true)
                .set_exclusive_start_key(start_key.take());

            if let Some(id) = id {
                request = request
                    .filter_expression("#id = :id")
                    .expression_attribute_names("#id", ID)
                    .expression_attribute_values(":id", Self::key(id));
            }

            let output = request
                .send()
                .await
                .map_err(|e| StoreError::backend("scan", DisplayErrorContext(&e)))?;
            pages += 1;

            for item in output.items() {
                records.push(from_item(item)?);
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        debug!(
            table = %self.table_name,
            filter = ?id,
            pages = pages,
            count = records.len(),
            "Scanned records from DynamoDB"
        );

        Ok(records)
    }
}
