//! Rolodex - record resolvers over a single-table store
//!
//! Query and mutation resolvers for one entity type, backed by a key-value
//! table and deployed as serverless functions behind a schema-typed API
//! gateway.

pub mod config;
pub mod handlers;
pub mod interfaces;
pub mod record;
pub mod storage;
pub mod utils;
