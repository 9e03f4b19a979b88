//! Application configuration.
//!
//! Loaded once at process start from YAML files and environment variables,
//! then treated as immutable.

mod storage;

pub use storage::{DynamoConfig, StoreConfig, StoreType, TableName};

use serde::Deserialize;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "ROLODEX_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "ROLODEX";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "ROLODEX_LOG";
/// Environment variable selecting the log output format (`json` or `text`).
pub const LOG_FORMAT_ENV_VAR: &str = "ROLODEX_LOG_FORMAT";
/// Legacy environment variable naming the backing table.
pub const TABLE_NAME_ENV_VAR: &str = "TABLE_NAME";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Table name is not configured (set store.table_name or TABLE_NAME)")]
    MissingTableName,

    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Store type '{0}' is not compiled into this build")]
    UnsupportedBackend(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Record store configuration.
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `config.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 4. Environment variables with `CONFIG_ENV_PREFIX` prefix
    /// 5. `TABLE_NAME_ENV_VAR`, only when no table name was set above
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: Config = config.try_deserialize()?;

        if config.store.table_name.trim().is_empty() {
            if let Ok(table) = std::env::var(TABLE_NAME_ENV_VAR) {
                config.store.table_name = table;
            }
        }

        Ok(config)
    }

    /// Create config for testing, backed by the in-memory store.
    pub fn for_test() -> Self {
        Self {
            store: StoreConfig {
                store_type: StoreType::Memory,
                table_name: "records-test".to_string(),
                dynamo: DynamoConfig::default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serial_test::serial;

    use super::*;

    fn clear_env() {
        std::env::remove_var(CONFIG_ENV_VAR);
        std::env::remove_var(TABLE_NAME_ENV_VAR);
        std::env::remove_var("ROLODEX__STORE__TABLE_NAME");
        std::env::remove_var("ROLODEX__STORE__TYPE");
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.store.store_type, StoreType::Dynamo);
        assert!(config.store.table_name.is_empty());
    }

    #[test]
    fn test_config_for_test() {
        let config = Config::for_test();
        assert_eq!(config.store.store_type, StoreType::Memory);
        assert_eq!(config.store.table_name().unwrap().as_str(), "records-test");
    }

    #[test]
    #[serial]
    fn test_load_from_file() {
        clear_env();
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "store:\n  type: memory\n  table_name: people\n  dynamo:\n    endpoint_url: http://localhost:8000"
        )
        .unwrap();

        let config = Config::load(file.path().to_str()).unwrap();
        assert_eq!(config.store.store_type, StoreType::Memory);
        assert_eq!(config.store.table_name, "people");
        assert_eq!(
            config.store.dynamo.endpoint_url.as_deref(),
            Some("http://localhost:8000")
        );
    }

    #[test]
    #[serial]
    fn test_prefixed_env_overrides_file() {
        clear_env();
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "store:\n  table_name: from-file").unwrap();
        std::env::set_var("ROLODEX__STORE__TABLE_NAME", "from-env");

        let config = Config::load(file.path().to_str()).unwrap();
        clear_env();

        assert_eq!(config.store.table_name, "from-env");
    }

    #[test]
    #[serial]
    fn test_legacy_table_name_fills_gap() {
        clear_env();
        std::env::set_var(TABLE_NAME_ENV_VAR, "legacy-table");

        let config = Config::load(None).unwrap();
        clear_env();

        assert_eq!(config.store.table_name().unwrap().as_str(), "legacy-table");
    }

    #[test]
    #[serial]
    fn test_legacy_table_name_does_not_override() {
        clear_env();
        std::env::set_var("ROLODEX__STORE__TABLE_NAME", "primary");
        std::env::set_var(TABLE_NAME_ENV_VAR, "legacy-table");

        let config = Config::load(None).unwrap();
        clear_env();

        assert_eq!(config.store.table_name, "primary");
    }

    #[test]
    #[serial]
    fn test_missing_required_file_fails() {
        clear_env();
        let result = Config::load(Some("/nonexistent/rolodex.yaml"));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}
