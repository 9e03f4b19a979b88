//! Bootstrap utilities for rolodex binaries.
//!
//! Shared initialization code for the resolver functions.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LOG_ENV_VAR, LOG_FORMAT_ENV_VAR};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// Resolve from a `LOG_FORMAT_ENV_VAR` value. Anything but `json` is text.
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// Initialize tracing with ROLODEX_LOG environment variable.
///
/// Defaults to "info" level if ROLODEX_LOG is not set. ROLODEX_LOG_FORMAT=json
/// switches to one JSON object per line.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));
    let format = LogFormat::from_value(std::env::var(LOG_FORMAT_ENV_VAR).ok().as_deref());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
