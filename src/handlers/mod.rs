//! Resolver handlers.
//!
//! Each resolver is bound to one gateway field: [`QueryResolver`] to the list
//! query, [`MutationResolver`] to the shared create/update/delete mutation.
//! Both take a raw JSON event and always answer with a [`ResolverResponse`].

pub mod envelope;
pub mod errmsg;
mod mutation;
mod query;
pub mod response;

pub use envelope::{
    CallerIdentity, CreateArgs, CreateInput, DeleteArgs, MutationEnvelope, MutationRequest,
    Operation, QueryEnvelope, RecordFilter, UpdateArgs, UpdateInput,
};
pub use mutation::MutationResolver;
pub use query::QueryResolver;
pub use response::{Failure, ResolverError, ResolverResponse};
