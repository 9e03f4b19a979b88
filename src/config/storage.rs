//! Storage configuration types.

use std::fmt;

use serde::Deserialize;

use super::ConfigError;

/// Storage type discriminator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    #[default]
    Dynamo,
    Memory,
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreType::Dynamo => write!(f, "dynamo"),
            StoreType::Memory => write!(f, "memory"),
        }
    }
}

/// Record store configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Storage type discriminator.
    #[serde(rename = "type")]
    pub store_type: StoreType,
    /// Name of the backing table. Required for every store type.
    pub table_name: String,
    /// DynamoDB-specific configuration.
    pub dynamo: DynamoConfig,
}

impl StoreConfig {
    /// Validate and return the table name.
    pub fn table_name(&self) -> Result<TableName, ConfigError> {
        TableName::new(&self.table_name)
    }
}

/// DynamoDB-specific configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DynamoConfig {
    /// Endpoint override, e.g. `http://localhost:8000` for DynamoDB Local.
    pub endpoint_url: Option<String>,
    /// Region override. Falls back to the SDK's provider chain.
    pub region: Option<String>,
}

/// A validated, non-empty table name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    pub fn new(name: &str) -> Result<Self, ConfigError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::MissingTableName);
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
