//! rolodex-query: list resolver function
//!
//! Serverless function bound to the gateway's list query. Each invocation
//! carries `{ callerIdentity, arguments: { id? } }` and answers with the
//! matching records or a `{ "error": ... }` failure payload.
//!
//! ## Configuration
//! - ROLODEX__STORE__TABLE_NAME (or legacy TABLE_NAME): backing table
//! - ROLODEX__STORE__TYPE: `dynamo` (default) or `memory`
//! - ROLODEX_LOG / ROLODEX_LOG_FORMAT: log filter and format

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;

use rolodex::config::Config;
use rolodex::handlers::QueryResolver;
use rolodex::storage::init_store;
use rolodex::utils::bootstrap::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let config = Config::load(None)?;
    let store = init_store(&config.store).await?;
    let resolver = QueryResolver::new(store);
    let resolver = &resolver;

    info!("rolodex-query started");

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        Ok::<_, Error>(resolver.handle(event.payload).await)
    }))
    .await
}
