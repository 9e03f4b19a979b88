//! Resolver errors and the structured response returned to the gateway.

use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use super::errmsg;
use crate::interfaces::record_store::StoreError;

/// Errors a resolver can produce. Every variant is converted to a
/// [`Failure`] at the resolver boundary.
#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    #[error("Record already exists: id={id}")]
    AlreadyExists { id: String },

    #[error("Record not found: id={id}")]
    NotFound { id: String },

    #[error("Record missing after write: id={id}")]
    InternalInconsistency { id: String },

    #[error("Invalid operation: {}", .tag.as_deref().unwrap_or("<none>"))]
    InvalidOperation { tag: Option<String> },

    #[error("Malformed arguments: {0}")]
    MalformedArguments(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ResolverError {
    /// Stable kind name reported as `errorType`.
    pub fn kind(&self) -> &'static str {
        match self {
            ResolverError::AlreadyExists { .. } => "AlreadyExists",
            ResolverError::NotFound { .. } => "NotFound",
            ResolverError::InternalInconsistency { .. } => "InternalInconsistency",
            ResolverError::InvalidOperation { .. } => "InvalidOperation",
            ResolverError::MalformedArguments(_) => "MalformedArguments",
            ResolverError::Store(_) => "StoreError",
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            ResolverError::AlreadyExists { .. } => 409,
            ResolverError::NotFound { .. } => 404,
            ResolverError::InvalidOperation { .. } | ResolverError::MalformedArguments(_) => 400,
            ResolverError::InternalInconsistency { .. } => 500,
            ResolverError::Store(_) => 503,
        }
    }

    /// Caller-visible failure payload.
    pub fn to_failure(&self) -> Failure {
        let message = match self {
            ResolverError::Store(_) => errmsg::STORE_UNAVAILABLE.to_string(),
            ResolverError::InternalInconsistency { id } => {
                format!("{}: id={}", errmsg::INCONSISTENT_WRITE, id)
            }
            other => other.to_string(),
        };
        Failure {
            status: self.status(),
            error_type: self.kind().to_string(),
            message,
        }
    }

    fn log(&self) {
        match self {
            ResolverError::Store(_) | ResolverError::InternalInconsistency { .. } => {
                error!(kind = self.kind(), error = %self, "Resolver failed");
            }
            _ => warn!(kind = self.kind(), error = %self, "Request rejected"),
        }
    }
}

/// Structured failure payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Failure {
    pub status: u16,
    pub error_type: String,
    pub message: String,
}

/// What a resolver hands back to the gateway: the payload, or `{ "error": Failure }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolverResponse<T> {
    Failed { error: Failure },
    Ok(T),
}

impl<T> ResolverResponse<T> {
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            ResolverResponse::Failed { error } => Some(error),
            ResolverResponse::Ok(_) => None,
        }
    }

    pub fn into_result(self) -> Result<T, Failure> {
        match self {
            ResolverResponse::Ok(value) => Ok(value),
            ResolverResponse::Failed { error } => Err(error),
        }
    }
}

impl<T> From<ResolverError> for ResolverResponse<T> {
    fn from(err: ResolverError) -> Self {
        ResolverResponse::Failed {
            error: err.to_failure(),
        }
    }
}

/// Convert a resolver outcome into a response, logging any failure.
pub fn respond<T>(result: Result<T, ResolverError>) -> ResolverResponse<T> {
    match result {
        Ok(value) => ResolverResponse::Ok(value),
        Err(err) => {
            err.log();
            err.into()
        }
    }
}
